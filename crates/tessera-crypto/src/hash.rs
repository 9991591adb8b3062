use tessera_types::Hash;

/// Compute blake3 hash of data
pub fn hash(data: &[u8]) -> Hash {
    Hash::compute(data)
}

/// Compute blake3 hash of multiple data slices
pub fn hash_multi(data: &[&[u8]]) -> Hash {
    Hash::compute_multi(data)
}

/// Hash two values together, order preserved.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    hash_multi(&[left.as_bytes(), right.as_bytes()])
}

/// Hash two values with the smaller one first.
///
/// Merkle proofs built with this commutative pairing carry no left/right
/// position bits; tree construction and verification must both use it.
pub fn hash_sorted_pair(a: &Hash, b: &Hash) -> Hash {
    if a <= b {
        hash_pair(a, b)
    } else {
        hash_pair(b, a)
    }
}

/// Hash with a domain separator
pub fn hash_with_domain(data: &[u8], domain: &str) -> Hash {
    hash_multi(&[domain.as_bytes(), data])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_pair_order_matters() {
        let h1 = hash(b"left");
        let h2 = hash(b"right");
        assert_ne!(hash_pair(&h1, &h2), hash_pair(&h2, &h1));
        assert_eq!(hash_pair(&h1, &h2), hash_pair(&h1, &h2));
    }

    #[test]
    fn test_hash_sorted_pair_is_commutative() {
        let h1 = hash(b"left");
        let h2 = hash(b"right");
        assert_eq!(hash_sorted_pair(&h1, &h2), hash_sorted_pair(&h2, &h1));

        let (lo, hi) = if h1 <= h2 { (h1, h2) } else { (h2, h1) };
        assert_eq!(hash_sorted_pair(&h1, &h2), hash_pair(&lo, &hi));
    }

    #[test]
    fn test_hash_with_domain() {
        let result1 = hash_with_domain(b"data", "domain1");
        let result2 = hash_with_domain(b"data", "domain2");
        assert_ne!(result1, result2);
        assert_eq!(result1, hash_with_domain(b"data", "domain1"));
    }
}
