use crate::domain::model::{
    round_cents, TransactionRequest, TransactionStatus, ACCOUNT_LENGTH, MAX_AMOUNT, MIN_AMOUNT,
};
use rand::Rng;

fn random_account<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ACCOUNT_LENGTH)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect()
}

/// Draws a fresh on-hold transaction with random accounts and an amount in
/// [50, 500] rounded to cents.
pub fn generate_request<R: Rng + ?Sized>(rng: &mut R) -> TransactionRequest {
    let from_account = random_account(rng);
    let to_account = random_account(rng);
    let amount = round_cents(rng.gen_range(MIN_AMOUNT..=MAX_AMOUNT));

    TransactionRequest::from_generated(from_account, to_account, amount, TransactionStatus::OnHold)
}

impl TransactionRequest {
    pub fn random() -> Self {
        generate_request(&mut rand::thread_rng())
    }
}
