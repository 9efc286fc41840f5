//! Construction of the payment transaction.
//!
//! A payment is one System Program `Transfer` instruction moving `lamports` from the
//! payer to the payout address. The payer is also the fee payer, and the message is
//! anchored to a recent blockhash so it expires shortly after being signed.

use solana_instruction::{AccountMeta, Instruction};
use solana_message::v0::Message as MessageV0;
use solana_message::{Hash, VersionedMessage};
use solana_pubkey::{Pubkey, pubkey};
use solana_signature::Signature;
use solana_transaction::versioned::VersionedTransaction;
use x402_pay_types::PaymentError;

pub const SYSTEM_PROGRAM_PUBKEY: Pubkey = pubkey!("11111111111111111111111111111111");

/// Index of `Transfer` in the System Program's instruction enum.
const SYSTEM_TRANSFER_TAG: u32 = 2;

/// Builds a System Program transfer of `lamports` from `from` to `to`.
///
/// Instruction data is the bincode layout of `SystemInstruction::Transfer`: a
/// little-endian `u32` tag followed by a little-endian `u64` amount.
pub fn transfer_instruction(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_TAG.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    Instruction::new_with_bytes(
        SYSTEM_PROGRAM_PUBKEY,
        &data,
        vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
    )
}

/// Builds the unsigned payment transaction: a single transfer from `payer` to `to`,
/// with `payer` as fee payer and `recent_blockhash` as the recency anchor.
///
/// Signature slots are pre-filled with default (all-zero) signatures, one per required
/// signer, for the wallet to fill in.
pub fn build_transfer_transaction(
    payer: &Pubkey,
    to: &Pubkey,
    lamports: u64,
    recent_blockhash: Hash,
) -> Result<VersionedTransaction, PaymentError> {
    let instruction = transfer_instruction(payer, to, lamports);
    let message = MessageV0::try_compile(payer, &[instruction], &[], recent_blockhash)
        .map_err(|e| PaymentError::TransactionBuild(format!("{e:?}")))?;
    let num_required_signatures = message.header.num_required_signatures as usize;
    Ok(VersionedTransaction {
        signatures: vec![Signature::default(); num_required_signatures],
        message: VersionedMessage::V0(message),
    })
}

/// Returns the fee payer's signature, which is always the first one.
///
/// A missing or all-zero signature means the wallet returned the transaction without
/// actually signing it.
pub fn fee_payer_signature(tx: &VersionedTransaction) -> Result<&Signature, PaymentError> {
    match tx.signatures.first() {
        Some(signature) if *signature != Signature::default() => Ok(signature),
        _ => Err(PaymentError::SigningRejected(
            "wallet returned an unsigned transaction".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payer() -> Pubkey {
        Pubkey::new_from_array([1u8; 32])
    }

    fn payout() -> Pubkey {
        Pubkey::new_from_array([2u8; 32])
    }

    #[test]
    fn test_transfer_instruction_layout() {
        let ix = transfer_instruction(&payer(), &payout(), 5_000_000);
        assert_eq!(ix.program_id, SYSTEM_PROGRAM_PUBKEY);
        assert_eq!(ix.data.len(), 12);
        assert_eq!(&ix.data[..4], &[2, 0, 0, 0]);
        assert_eq!(&ix.data[4..], &5_000_000u64.to_le_bytes());

        assert_eq!(ix.accounts.len(), 2);
        assert_eq!(ix.accounts[0].pubkey, payer());
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, payout());
        assert!(!ix.accounts[1].is_signer);
        assert!(ix.accounts[1].is_writable);
    }

    #[test]
    fn test_transaction_shape() {
        let blockhash = Hash::new_from_array([5u8; 32]);
        let tx = build_transfer_transaction(&payer(), &payout(), 42, blockhash).unwrap();

        assert_eq!(tx.message.header().num_required_signatures, 1);
        assert_eq!(tx.signatures, vec![Signature::default()]);
        assert_eq!(tx.message.recent_blockhash(), &blockhash);

        let keys = tx.message.static_account_keys();
        assert_eq!(keys[0], payer());
        assert!(keys.contains(&payout()));
        assert!(keys.contains(&SYSTEM_PROGRAM_PUBKEY));

        let instructions = tx.message.instructions();
        assert_eq!(instructions.len(), 1);
        let ix = &instructions[0];
        assert_eq!(keys[ix.program_id_index as usize], SYSTEM_PROGRAM_PUBKEY);
        assert_eq!(keys[ix.accounts[0] as usize], payer());
        assert_eq!(keys[ix.accounts[1] as usize], payout());
        assert_eq!(&ix.data[4..], &42u64.to_le_bytes());
    }

    #[test]
    fn test_unsigned_transaction_has_no_fee_payer_signature() {
        let tx = build_transfer_transaction(&payer(), &payout(), 1, Hash::default()).unwrap();
        let err = fee_payer_signature(&tx).unwrap_err();
        assert!(matches!(err, PaymentError::SigningRejected(_)));
    }

    #[test]
    fn test_fee_payer_signature_is_first() {
        let mut tx = build_transfer_transaction(&payer(), &payout(), 1, Hash::default()).unwrap();
        tx.signatures[0] = Signature::from([7u8; 64]);
        assert_eq!(fee_payer_signature(&tx).unwrap(), &Signature::from([7u8; 64]));
    }
}
