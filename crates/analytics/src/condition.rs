use core_types::MarketCondition;

/// Maps a z-score onto its market-condition band.
///
/// | z                | condition            |
/// |------------------|----------------------|
/// | `[-2.0, -1.5)`   | `ExtremeOversold`    |
/// | `[-1.5, -0.2)`   | `Oversold`           |
/// | `[-0.2, 0.2]`    | `Neutral`            |
/// | `(0.2, 1.5]`     | `Overbought`         |
/// | `(1.5, 2.0]`     | `ExtremeOverbought`  |
/// | anything else    | `OutOfRange`         |
///
/// Bands are tested in the order above and the first match wins. NaN matches
/// nothing and lands in `OutOfRange`.
pub fn classify_market_condition(z: f64) -> MarketCondition {
    if (-2.0..-1.5).contains(&z) {
        MarketCondition::ExtremeOversold
    } else if (-1.5..-0.2).contains(&z) {
        MarketCondition::Oversold
    } else if (-0.2..=0.2).contains(&z) {
        MarketCondition::Neutral
    } else if z > 0.2 && z <= 1.5 {
        MarketCondition::Overbought
    } else if z > 1.5 && z <= 2.0 {
        MarketCondition::ExtremeOverbought
    } else {
        MarketCondition::OutOfRange
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MarketCondition::*;

    #[test]
    fn classifies_representative_scores() {
        assert_eq!(classify_market_condition(-1.87), ExtremeOversold);
        assert_eq!(classify_market_condition(-0.9), Oversold);
        assert_eq!(classify_market_condition(0.0), Neutral);
        assert_eq!(classify_market_condition(1.0), Overbought);
        assert_eq!(classify_market_condition(1.8), ExtremeOverbought);
        assert_eq!(classify_market_condition(3.0), OutOfRange);
        assert_eq!(classify_market_condition(-3.0), OutOfRange);
    }

    #[test]
    fn boundaries_follow_the_band_table() {
        assert_eq!(classify_market_condition(-2.0), ExtremeOversold);
        assert_eq!(classify_market_condition(-1.50001), ExtremeOversold);
        assert_eq!(classify_market_condition(-1.5), Oversold);
        assert_eq!(classify_market_condition(-0.20001), Oversold);
        assert_eq!(classify_market_condition(-0.2), Neutral);
        assert_eq!(classify_market_condition(0.2), Neutral);
        assert_eq!(classify_market_condition(0.20001), Overbought);
        assert_eq!(classify_market_condition(1.5), Overbought);
        assert_eq!(classify_market_condition(1.50001), ExtremeOverbought);
        assert_eq!(classify_market_condition(2.0), ExtremeOverbought);
        assert_eq!(classify_market_condition(2.00001), OutOfRange);
        assert_eq!(classify_market_condition(-2.00001), OutOfRange);
    }

    #[test]
    fn non_finite_scores_are_out_of_range() {
        assert_eq!(classify_market_condition(f64::NAN), OutOfRange);
        assert_eq!(classify_market_condition(f64::INFINITY), OutOfRange);
        assert_eq!(classify_market_condition(f64::NEG_INFINITY), OutOfRange);
    }
}
