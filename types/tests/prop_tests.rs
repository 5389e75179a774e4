use proptest::prelude::*;

use levy_types::amount::{format_ui, to_raw, unit};
use levy_types::{Address, TokenAccount, TxHash};

proptest! {
    /// Address hex display parses back to the same address.
    #[test]
    fn address_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let addr = Address::new(bytes);
        prop_assert_eq!(Address::from_hex(&addr.to_string()), Some(addr));
    }

    /// TxHash::is_zero is true only for all-zero bytes.
    #[test]
    fn tx_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// TokenAccount bincode serialization keeps the withheld extension intact.
    #[test]
    fn token_account_bincode_roundtrip(amount in any::<u64>(), withheld in proptest::option::of(any::<u64>())) {
        let mut account = TokenAccount::new(Address::new([1; 32]), levy_types::PublicKey([2; 32]), Address::new([3; 32]));
        account.amount = amount;
        account.transfer_fee_amount = withheld.map(|w| levy_types::TransferFeeAmount { withheld_amount: w });
        let encoded = bincode::serialize(&account).unwrap();
        let decoded: TokenAccount = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.withheld_amount(), withheld.unwrap_or(0));
        prop_assert_eq!(decoded, account);
    }

    /// to_raw agrees with the unit scale whenever it does not overflow.
    #[test]
    fn to_raw_matches_unit(whole in 0u64..1_000_000_000, decimals in 0u8..=9) {
        let expected = unit(decimals).unwrap() * whole;
        prop_assert_eq!(to_raw(whole, decimals), Some(expected));
    }

    /// format_ui always has `decimals` fractional digits and strips back to the raw value.
    #[test]
    fn format_ui_preserves_digits(raw in any::<u64>(), decimals in 1u8..=12) {
        let rendered = format_ui(raw, decimals);
        let (whole, frac) = rendered.split_once('.').unwrap();
        prop_assert_eq!(frac.len(), usize::from(decimals));
        let joined: u128 = format!("{whole}{frac}").parse().unwrap();
        prop_assert_eq!(joined, u128::from(raw));
    }
}
