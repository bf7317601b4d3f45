use logvault_core::hash::{hash_bytes, hash_file};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn known_vectors() {
    assert_eq!(
        hash_bytes(b"Hello, World!"),
        "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
    );
    assert_eq!(
        hash_bytes(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn file_and_buffer_agree() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("data.txt");
    std::fs::write(&path, b"Hello, World!").unwrap();
    assert_eq!(hash_file(&path).unwrap(), hash_bytes(b"Hello, World!"));
}

#[test]
fn file_and_buffer_agree_across_chunks() {
    // 100 KiB spans many 8 KiB hashing chunks.
    let mut rng = StdRng::seed_from_u64(7);
    let data: Vec<u8> = (0..100 * 1024).map(|_| rng.gen()).collect();
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("blob.bin");
    std::fs::write(&path, &data).unwrap();
    assert_eq!(hash_file(&path).unwrap(), hash_bytes(&data));
}

#[test]
fn missing_file_is_an_error() {
    let td = tempfile::tempdir().unwrap();
    assert!(hash_file(&td.path().join("nope")).is_err());
}
