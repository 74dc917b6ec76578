//! Estimate number generation tests.

use workorder_service::services::numbering;

#[test]
fn month_prefix_zero_pads_the_month() {
    assert_eq!(numbering::month_prefix(2025, 6), "EST-2025-06");
    assert_eq!(numbering::month_prefix(2025, 12), "EST-2025-12");
}

#[test]
fn first_number_of_a_month_starts_at_one() {
    assert_eq!(
        numbering::next_in_sequence("EST-2025-06", None),
        "EST-2025-06-00001"
    );
}

#[test]
fn sequence_increments_from_the_latest_issued_number() {
    assert_eq!(
        numbering::next_in_sequence("EST-2025-06", Some("EST-2025-06-00007")),
        "EST-2025-06-00008"
    );
}

#[test]
fn counter_keeps_five_digit_padding() {
    assert_eq!(
        numbering::next_in_sequence("EST-2025-06", Some("EST-2025-06-00099")),
        "EST-2025-06-00100"
    );
}

#[test]
fn counter_grows_past_five_digits_without_truncation() {
    assert_eq!(
        numbering::next_in_sequence("EST-2025-06", Some("EST-2025-06-99999")),
        "EST-2025-06-100000"
    );
}

#[test]
fn unparseable_counter_falls_back_to_one() {
    assert_eq!(
        numbering::next_in_sequence("EST-2025-06", Some("EST-2025-06-garbage")),
        "EST-2025-06-00001"
    );
}

#[test]
fn new_month_prefix_restarts_the_sequence() {
    // The store only ever reports the latest number under the requested
    // prefix, so a fresh month sees no latest number at all.
    let june = numbering::next_in_sequence("EST-2025-06", Some("EST-2025-06-00042"));
    let july = numbering::next_in_sequence("EST-2025-07", None);

    assert_eq!(june, "EST-2025-06-00043");
    assert_eq!(july, "EST-2025-07-00001");
}
