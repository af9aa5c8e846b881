use tendency_core::{Operation, Variant};

pub fn run() {
    println!("Bit mapping: 0 → {}, 1 → {}\n", Operation::from_bit(false), Operation::from_bit(true));
    println!("  {:<10} {:>15} {:>13}", "variant", "reset_to_zero", "fill_random");
    for variant in Variant::ALL {
        println!(
            "  {:<10} {:>15} {:>13}",
            variant.to_string(),
            format_delta(variant.delta(Operation::ResetToZero)),
            format_delta(variant.delta(Operation::FillRandom)),
        );
    }
}

fn format_delta(delta: i64) -> String {
    format!("{delta:+}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_delta_signed() {
        assert_eq!(format_delta(1), "+1");
        assert_eq!(format_delta(-1), "-1");
    }
}
