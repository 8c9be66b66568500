use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::domain::plan::BudgetAllocation;
use crate::domain::region::RegionScore;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Splits `total_budget` across regions in proportion to their suggested
/// percentages, largest allocation first.
///
/// Amounts and percentages are rounded to cents; the rounding residual is
/// folded into the largest allocation so percentages total exactly 100.00 and
/// amounts total exactly `total_budget`. Negative or non-finite suggestions
/// count as zero; when every suggestion is zero each region receives nothing.
pub fn allocate_budget(ranked_regions: &[RegionScore], total_budget: u64) -> Vec<BudgetAllocation> {
    let weights: Vec<Decimal> = ranked_regions
        .iter()
        .map(|region| {
            Decimal::from_f64(region.suggested_budget_pct)
                .filter(|pct| pct.is_sign_positive())
                .unwrap_or(Decimal::ZERO)
        })
        .collect();
    let (weights, total_weight) = scale_to_fit(weights);
    let budget = Decimal::from(total_budget);

    let mut allocations: Vec<BudgetAllocation> = ranked_regions
        .iter()
        .zip(&weights)
        .map(|(region, weight)| {
            let pct = if total_weight > Decimal::ZERO {
                *weight / total_weight * ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
            let amount = pct / ONE_HUNDRED * budget;

            BudgetAllocation {
                region: region.region.clone(),
                budget_amount: amount.round_dp(2),
                percentage: pct.round_dp(2),
                tier: region.tier,
                justification: region.recommendation.clone(),
            }
        })
        .collect();

    sort_largest_first(&mut allocations);

    if total_weight > Decimal::ZERO {
        settle_residuals(&mut allocations, budget);
        sort_largest_first(&mut allocations);
    }

    allocations
}

// Suggestions large enough to overflow their sum are rescaled against the largest one.
fn scale_to_fit(weights: Vec<Decimal>) -> (Vec<Decimal>, Decimal) {
    if let Some(total) = checked_total(&weights) {
        return (weights, total);
    }

    let largest = weights.iter().copied().max().unwrap_or(Decimal::ONE);
    let scaled: Vec<Decimal> = weights.iter().map(|weight| *weight / largest).collect();
    let total = checked_total(&scaled).unwrap_or(Decimal::ZERO);
    (scaled, total)
}

fn checked_total(weights: &[Decimal]) -> Option<Decimal> {
    weights.iter().try_fold(Decimal::ZERO, |total, weight| total.checked_add(*weight))
}

fn settle_residuals(allocations: &mut [BudgetAllocation], budget: Decimal) {
    let pct_residual =
        ONE_HUNDRED - allocations.iter().map(|entry| entry.percentage).sum::<Decimal>();
    let amount_residual =
        budget - allocations.iter().map(|entry| entry.budget_amount).sum::<Decimal>();

    if let Some(largest) = allocations.first_mut() {
        largest.percentage += pct_residual;
        largest.budget_amount += amount_residual;
    }
}

fn sort_largest_first(allocations: &mut [BudgetAllocation]) {
    allocations.sort_by(|left, right| right.budget_amount.cmp(&left.budget_amount));
}
