use crate::{
	error::AppError,
	models::NewStorage,
	rules::{parse_amount, parse_count, validate_capacity, CapacityRule},
	tests::fixtures::TestFixtures,
};
use bigdecimal::BigDecimal;
use std::str::FromStr;

#[test]
fn capacity_at_limit_is_accepted() {
	assert!(validate_capacity(100, 2, 50).is_ok());
	assert!(validate_capacity(0, 1, 50).is_ok());
	assert!(validate_capacity(50, 1, 50).is_ok());
}

#[test]
fn capacity_over_limit_is_rejected() {
	match validate_capacity(101, 2, 50) {
		Err(AppError::CapacityExceeded { current_capacity, slot_count, per_slot, limit }) => {
			assert_eq!(current_capacity, 101);
			assert_eq!(slot_count, 2);
			assert_eq!(per_slot, 50);
			assert_eq!(limit, 100);
		},
		other => panic!("expected CapacityExceeded, got {:?}", other),
	}
}

#[test]
fn capacity_rule_uses_configured_slot_size() {
	let rule = CapacityRule::new(10);
	let storage =
		NewStorage { owner_name: "A".to_string(), slot_count: 3, current_capacity: 30 };
	assert!(rule.check(&storage).is_ok());

	let storage = NewStorage { current_capacity: 31, ..storage };
	assert!(matches!(rule.check(&storage), Err(AppError::CapacityExceeded { .. })));
	assert_eq!(CapacityRule::default().max_per_slot(), 50);
}

#[test]
fn capacity_limit_does_not_overflow() {
	let rule = CapacityRule::new(i32::MAX);
	assert_eq!(rule.limit(i32::MAX), i64::from(i32::MAX) * i64::from(i32::MAX));
	assert!(validate_capacity(i32::MAX, i32::MAX, i32::MAX).is_ok());
}

#[test]
fn amounts_accept_plain_and_grouped_numbers() {
	assert_eq!(parse_amount("fcd", "100000").unwrap(), BigDecimal::from(100000));
	assert_eq!(parse_amount("fcd", " 100,000 ").unwrap(), BigDecimal::from(100000));
	assert_eq!(
		parse_amount("usd", "1,234,567.89").unwrap(),
		BigDecimal::from_str("1234567.89").unwrap()
	);
	assert_eq!(parse_amount("rub", "-12.5").unwrap(), BigDecimal::from_str("-12.5").unwrap());
	assert_eq!(parse_amount("yen", "+7").unwrap(), BigDecimal::from(7));
}

#[test]
fn amounts_reject_anything_that_is_not_a_number() {
	for raw in [
		"",
		"   ",
		"abc",
		"1e5",
		"__import__('os')",
		"1+1",
		"1,00",
		",100",
		"100,",
		"1,0000",
		"1.",
		".5",
		"1.2.3",
		"--1",
		"0x10",
		"1 000",
	] {
		assert!(
			matches!(parse_amount("fcd", raw), Err(AppError::InvalidInput { field: "fcd", .. })),
			"{raw:?} should be rejected"
		);
	}
}

#[test]
fn counts_are_whole_numbers_in_range() {
	assert_eq!(parse_count("slot_count", "3").unwrap(), 3);
	assert_eq!(parse_count("slot_count", "1,200").unwrap(), 1200);
	assert!(parse_count("slot_count", "1.5").is_err());
	assert!(parse_count("slot_count", "99999999999").is_err());
	assert!(parse_count("slot_count", "three").is_err());
}

#[test]
fn storage_form_enforces_ranges() {
	assert!(TestFixtures::storage("A", 1, 0).parse().is_ok());
	assert!(matches!(TestFixtures::storage("A", 0, 0).parse(), Err(AppError::Validation(_))));
	assert!(matches!(TestFixtures::storage("A", 1, -1).parse(), Err(AppError::Validation(_))));
	assert!(matches!(TestFixtures::storage("  ", 1, 0).parse(), Err(AppError::Validation(_))));
}

#[test]
fn participant_form_trims_name_and_parses_balances() {
	let parsed = TestFixtures::participant("  X ", "1,000").parse().unwrap();
	assert_eq!(parsed.name, "X");
	assert_eq!(parsed.fcd, BigDecimal::from(1000));
	assert_eq!(parsed.yen, BigDecimal::from(1000));

	let mut form = TestFixtures::participant("X", "1");
	form.sar = "1;drop".to_string();
	assert!(matches!(form.parse(), Err(AppError::InvalidInput { field: "sar", .. })));
}
