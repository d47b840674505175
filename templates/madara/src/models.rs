use aidoku::alloc::String;
use serde::Deserialize;

// CryptoJS-style payload embedded in the chapter protector script
#[derive(Deserialize)]
pub struct ProtectorData {
	// hex-encoded salt
	pub s: String,
	// base64-encoded ciphertext
	pub ct: String,
}
