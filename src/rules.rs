use crate::{constants::DEFAULT_MAX_CAPACITY_PER_SLOT, error::AppError, models::NewStorage};
use bigdecimal::BigDecimal;
use std::str::FromStr;

/// Storage capacity limit, configured per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityRule {
	max_per_slot: i32,
}

impl CapacityRule {
	pub fn new(max_per_slot: i32) -> Self {
		Self { max_per_slot }
	}

	pub fn max_per_slot(&self) -> i32 {
		self.max_per_slot
	}

	pub fn limit(&self, slot_count: i32) -> i64 {
		i64::from(slot_count) * i64::from(self.max_per_slot)
	}

	pub fn check(&self, storage: &NewStorage) -> Result<(), AppError> {
		validate_capacity(storage.current_capacity, storage.slot_count, self.max_per_slot)
	}
}

impl Default for CapacityRule {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_CAPACITY_PER_SLOT)
	}
}

/// Fails when `current_capacity > slot_count * max_per_slot`.
pub fn validate_capacity(
	current_capacity: i32,
	slot_count: i32,
	max_per_slot: i32,
) -> Result<(), AppError> {
	let limit = CapacityRule::new(max_per_slot).limit(slot_count);
	if i64::from(current_capacity) > limit {
		return Err(AppError::CapacityExceeded {
			current_capacity,
			slot_count,
			per_slot: max_per_slot,
			limit,
		});
	}
	Ok(())
}

/// Parses a currency balance such as `100000`, `-12.5` or `100,000.75`.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<BigDecimal, AppError> {
	let normalized = normalize_number(field, raw, true)?;
	BigDecimal::from_str(&normalized).map_err(|e| AppError::invalid(field, e.to_string()))
}

/// Parses a whole number such as `3` or `1,200`.
pub fn parse_count(field: &'static str, raw: &str) -> Result<i32, AppError> {
	let normalized = normalize_number(field, raw, false)?;
	normalized.parse::<i32>().map_err(|_| AppError::invalid(field, "number is out of range"))
}

// Accepts an optional sign, digits with optional well-formed thousands
// separators and, when allowed, a fractional part. Returns the number with
// separators removed.
fn normalize_number(field: &'static str, raw: &str, allow_fraction: bool) -> Result<String, AppError> {
	let text = raw.trim();
	if text.is_empty() {
		return Err(AppError::invalid(field, "a value is required"));
	}

	let (sign, unsigned) = match text.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", text.strip_prefix('+').unwrap_or(text)),
	};

	let (whole, fraction) = match unsigned.split_once('.') {
		Some((whole, fraction)) => (whole, Some(fraction)),
		None => (unsigned, None),
	};

	if let Some(fraction) = fraction {
		if !allow_fraction {
			return Err(AppError::invalid(field, "must be a whole number"));
		}
		if !is_digits(fraction) {
			return Err(AppError::invalid(field, format!("`{text}` is not a number")));
		}
	}

	let groups: Vec<&str> = whole.split(',').collect();
	let well_formed = match groups.split_first() {
		Some((first, [])) => is_digits(first),
		Some((first, rest)) =>
			is_digits(first) && first.len() <= 3 && rest.iter().all(|g| g.len() == 3 && is_digits(g)),
		None => false,
	};
	if !well_formed {
		return Err(AppError::invalid(field, format!("`{text}` is not a number")));
	}

	let mut normalized = String::with_capacity(text.len());
	normalized.push_str(sign);
	normalized.push_str(&groups.concat());
	if let Some(fraction) = fraction {
		normalized.push('.');
		normalized.push_str(fraction);
	}
	Ok(normalized)
}

fn is_digits(s: &str) -> bool {
	!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
