use super::*;

#[test]
fn shorten_keeps_both_ends() {
    assert_eq!(shorten_address("So11111111111111111111111111111111111111112", 4), "So11...1112");
    assert_eq!(shorten_address("abcdefgh", 4), "abcdefgh");
    assert_eq!(shorten_address("abc", 4), "abc");
}

#[test]
fn format_sol_two_decimals() {
    assert_eq!(format_sol(0), "0.00");
    assert_eq!(format_sol(1_000_000_000), "1.00");
    assert_eq!(format_sol(1_500_000_000), "1.50");
    assert_eq!(format_sol(1_234_567_890), "1.23");
    assert_eq!(format_sol(5_000_000), "0.01");
    assert_eq!(format_sol(4_999_999), "0.00");
    assert_eq!(format_sol(999_999_999), "1.00");
}

#[test]
fn format_fee_percent() {
    assert_eq!(format_fee_bps(0), "0%");
    assert_eq!(format_fee_bps(250), "2.5%");
    assert_eq!(format_fee_bps(125), "1.25%");
    assert_eq!(format_fee_bps(10_000), "100%");
    assert_eq!(format_fee_bps(5), "0.05%");
}
