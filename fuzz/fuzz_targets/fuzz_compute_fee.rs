#![no_main]

use libfuzzer_sys::fuzz_target;

use levy_fee::compute_fee;

// The fee is bounded by the cap, the proportional fee and the amount itself,
// and out-of-range rates are rejected rather than computed.
fuzz_target!(|input: (u64, u16, u64)| {
    let (amount, bps, max_fee) = input;
    match compute_fee(amount, bps, max_fee) {
        Ok(fee) => {
            assert!(bps <= 10_000);
            assert!(fee <= max_fee);
            assert!(fee <= amount);
            assert!(u128::from(fee) <= u128::from(amount) * u128::from(bps) / 10_000);
        }
        Err(_) => assert!(bps > 10_000),
    }
});
