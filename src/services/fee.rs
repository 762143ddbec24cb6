use serde::Serialize;

use crate::models::VehicleRecord;

pub const FEE_UP_TO_1000_CC: u32 = 800;
pub const FEE_ABOVE_1000_CC: u32 = 1000;
pub const FEE_DIESEL: u32 = 1000;

/// Inspection fee in PKR.
pub fn testing_fee(engine_cc: u32, diesel: bool) -> u32 {
    if diesel {
        FEE_DIESEL
    } else if engine_cc <= 1000 {
        FEE_UP_TO_1000_CC
    } else {
        FEE_ABOVE_1000_CC
    }
}

pub fn fee_category(engine_cc: u32, diesel: bool) -> &'static str {
    if diesel {
        "Diesel Vehicle"
    } else if engine_cc <= 1000 {
        "Up to 1,000 cc"
    } else {
        "Above 1,000 cc"
    }
}

pub fn format_fee(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("PKR {grouped}")
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeeQuote {
    pub engine_cc: u32,
    pub fee: u32,
    pub category: &'static str,
    pub formatted_fee: String,
}

/// `None` when the vehicle record has no usable engine capacity.
pub fn quote_for(vehicle: &VehicleRecord) -> Option<FeeQuote> {
    let engine_cc = vehicle.engine_capacity()?;
    let diesel = vehicle.is_diesel();
    let fee = testing_fee(engine_cc, diesel);
    Some(FeeQuote {
        engine_cc,
        fee,
        category: fee_category(engine_cc, diesel),
        formatted_fee: format_fee(fee),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_schedule() {
        assert_eq!(testing_fee(800, false), 800);
        assert_eq!(testing_fee(1000, false), 800);
        assert_eq!(testing_fee(1001, false), 1000);
        assert_eq!(testing_fee(660, true), 1000);
    }

    #[test]
    fn test_fee_category() {
        assert_eq!(fee_category(1000, false), "Up to 1,000 cc");
        assert_eq!(fee_category(1300, false), "Above 1,000 cc");
        assert_eq!(fee_category(1300, true), "Diesel Vehicle");
    }

    #[test]
    fn test_format_fee() {
        assert_eq!(format_fee(800), "PKR 800");
        assert_eq!(format_fee(1000), "PKR 1,000");
        assert_eq!(format_fee(1234567), "PKR 1,234,567");
        assert_eq!(format_fee(0), "PKR 0");
    }

    #[test]
    fn test_quote_for_vehicle() {
        let mut vehicle = VehicleRecord {
            registration_number: "ISB-2020".to_string(),
            name: "Toyota Hilux".to_string(),
            variant: String::new(),
            color: String::new(),
            model_year: String::new(),
            owner: String::new(),
            chassis_number: String::new(),
            registration_date: String::new(),
            engine_cc: Some("2800".to_string()),
            vehicle_type: Some("Diesel".to_string()),
        };
        let quote = quote_for(&vehicle).unwrap();
        assert_eq!(quote.fee, 1000);
        assert_eq!(quote.category, "Diesel Vehicle");
        assert_eq!(quote.formatted_fee, "PKR 1,000");

        vehicle.engine_cc = None;
        assert!(quote_for(&vehicle).is_none());
    }
}
