use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::constants::REFERENCE_COLLECTION_NAME;

// Name-based (version 3, MD5) UUIDs, so the same name always gives the same
// id across runs and machines.
pub fn derive_id(namespace: &Uuid, name: &str) -> Uuid {
    Uuid::new_v3(namespace, name.as_bytes())
}

pub fn derive_dns_id(name: &str) -> Uuid {
    derive_id(&Uuid::NAMESPACE_DNS, name)
}

// the id of the reference variant collection
pub static REF_COL_ID: Lazy<Uuid> =
    Lazy::new(|| derive_dns_id(REFERENCE_COLLECTION_NAME));

#[test]
fn test_derive_id_is_deterministic() {
    let first = derive_dns_id("my-variant-set");
    let second = derive_dns_id("my-variant-set");
    assert_eq!(first, second);
    assert_eq!(first.get_version_num(), 3);
    assert_ne!(first, derive_dns_id("my-other-variant-set"));
    assert_ne!(first, derive_id(&Uuid::NAMESPACE_URL, "my-variant-set"));
}

#[test]
fn test_known_dns_ids() {
    assert_eq!(derive_dns_id("python.org").to_string(),
               "6fa459ea-ee8a-3ca4-894e-db77e160355e");
    assert_eq!(*REF_COL_ID, derive_dns_id("www.internationalgenome.org"));
}
