use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use aidoku::alloc::Vec;
use md5::{Digest, Md5};

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const SALT_HEADER: &[u8] = b"Salted__";

// decrypts an OpenSSL enc-style payload ("Salted__" + 8 salt bytes + ciphertext)
// with AES-256-CBC, deriving key and iv from the passphrase via EVP_BytesToKey
pub fn decrypt_openssl_aes(payload: &[u8], passphrase: &[u8]) -> Option<Vec<u8>> {
	let (salt, ciphertext) = if payload.len() > 16 && &payload[..8] == SALT_HEADER {
		(&payload[8..16], &payload[16..])
	} else {
		(&payload[..0], payload)
	};

	let mut derived = [0u8; 32 + 16];
	derive_key_iv(passphrase, salt, &mut derived);
	let (key, iv) = derived.split_at(32);

	Aes256CbcDec::new_from_slices(key, iv)
		.ok()?
		.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
		.ok()
}

// EVP_BytesToKey with a single MD5 round, matching CryptoJS passphrase mode
fn derive_key_iv(passphrase: &[u8], salt: &[u8], output: &mut [u8]) {
	let mut block: Vec<u8> = Vec::new();
	let mut generated: Vec<u8> = Vec::with_capacity(output.len() + 16);
	while generated.len() < output.len() {
		let mut hasher = Md5::new();
		hasher.update(&block);
		hasher.update(passphrase);
		hasher.update(salt);
		block = hasher.finalize().to_vec();
		generated.extend_from_slice(&block);
	}
	output.copy_from_slice(&generated[..output.len()]);
}

#[cfg(test)]
mod test {
	use super::*;
	use aidoku::alloc::String;
	use aidoku_test::aidoku_test;
	use base64::prelude::*;

	#[aidoku_test]
	fn openssl_compatible_decryption() {
		// payload produced with `echo -n ... | openssl enc -aes-256-cbc -pass pass:...`
		let payload = BASE64_STANDARD
			.decode(
				"U2FsdGVkX1+tsmZvCEFa/iGeSA0K7gvgs9KXeZKwbCDNCs2zPo+BXjvKYLrJutMK+hxTwl/hyaQLOaD7LLIRo2I5fyeRMPnroo6k8N9uwKk=",
			)
			.unwrap();
		let plaintext = decrypt_openssl_aes(&payload, "René Über".as_bytes()).unwrap();
		assert_eq!(
			String::from_utf8(plaintext).unwrap(),
			"The quick brown fox jumps over the lazy dog. 👻 👻"
		);
	}

	#[aidoku_test]
	fn wrong_passphrase_fails() {
		let payload = BASE64_STANDARD
			.decode(
				"U2FsdGVkX1+tsmZvCEFa/iGeSA0K7gvgs9KXeZKwbCDNCs2zPo+BXjvKYLrJutMK+hxTwl/hyaQLOaD7LLIRo2I5fyeRMPnroo6k8N9uwKk=",
			)
			.unwrap();
		assert!(decrypt_openssl_aes(&payload, b"wrong").is_none());
	}
}
