use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Checks the gateway's HMAC-SHA256 signature over `"<order_id>|<payment_id>"`.
#[derive(Clone)]
pub struct SignatureVerifier {
    keyed: HmacSha256,
}

impl SignatureVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, InvalidLength> {
        Ok(Self { keyed: HmacSha256::new_from_slice(secret.as_ref())? })
    }

    /// Lowercase hex signature the gateway would have produced.
    pub fn sign(&self, gateway_order_id: &str, gateway_payment_id: &str) -> String {
        hex::encode(self.digest(gateway_order_id, gateway_payment_id))
    }

    /// The supplied signature must equal the lowercase hex digest exactly.
    pub fn verify(&self, gateway_order_id: &str, gateway_payment_id: &str, signature: &str) -> bool {
        let expected = self.sign(gateway_order_id, gateway_payment_id);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }

    fn digest(&self, gateway_order_id: &str, gateway_payment_id: &str) -> Vec<u8> {
        let mut mac = self.keyed.clone();
        mac.update(gateway_order_id.as_bytes());
        mac.update(b"|");
        mac.update(gateway_payment_id.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}
