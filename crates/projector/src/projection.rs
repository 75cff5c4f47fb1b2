use kardex_core::{InventoryError, InventoryResult};
use kardex_ledger::{MovementKind, StockMovement};

/// Compute the quantity that results from applying one movement.
///
/// Fails with `InsufficientStock` if a salida would drive the quantity
/// negative; the caller must then abort the whole registration with no ledger
/// append. Entrada overflow is rejected as a validation error rather than
/// wrapping.
pub fn apply_movement(current: u64, kind: MovementKind, quantity: u64) -> InventoryResult<u64> {
    match kind {
        MovementKind::Entrada => current.checked_add(quantity).ok_or_else(|| {
            InventoryError::validation("stock quantity overflow")
        }),
        MovementKind::Salida => current
            .checked_sub(quantity)
            .ok_or(InventoryError::InsufficientStock {
                available: current,
                requested: quantity,
            }),
    }
}

/// Fold a product's full movement history into its current quantity.
///
/// Movements must be supplied in causal order. A valid ledger never dips
/// negative mid-fold; if one does, the ledger and the stored quantity have
/// diverged and the error is surfaced rather than masked.
pub fn project<'a>(movements: impl IntoIterator<Item = &'a StockMovement>) -> InventoryResult<u64> {
    let mut quantity = 0u64;
    for m in movements {
        quantity = apply_movement(quantity, m.kind, m.quantity)?;
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kardex_core::{MovementId, ProductId};

    fn movement(product_id: ProductId, kind: MovementKind, quantity: u64, seq: u64) -> StockMovement {
        StockMovement {
            id: MovementId::new(),
            product_id,
            kind,
            quantity,
            note: None,
            occurred_at: Utc::now(),
            sequence: seq,
        }
    }

    #[test]
    fn entrada_adds_and_salida_subtracts() {
        assert_eq!(apply_movement(10, MovementKind::Entrada, 5).unwrap(), 15);
        assert_eq!(apply_movement(10, MovementKind::Salida, 3).unwrap(), 7);
    }

    #[test]
    fn salida_below_zero_is_insufficient_stock() {
        let err = apply_movement(10, MovementKind::Salida, 15).unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                available: 10,
                requested: 15
            }
        );
    }

    #[test]
    fn salida_to_exactly_zero_is_allowed() {
        assert_eq!(apply_movement(10, MovementKind::Salida, 10).unwrap(), 0);
    }

    #[test]
    fn entrada_overflow_is_rejected() {
        assert!(matches!(
            apply_movement(u64::MAX, MovementKind::Entrada, 1),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn project_folds_in_order() {
        let pid = ProductId::new();
        let history = [
            movement(pid, MovementKind::Entrada, 10, 1),
            movement(pid, MovementKind::Entrada, 5, 2),
            movement(pid, MovementKind::Salida, 3, 3),
        ];
        assert_eq!(project(&history).unwrap(), 12);
    }

    #[test]
    fn project_surfaces_divergence() {
        let pid = ProductId::new();
        let history = [
            movement(pid, MovementKind::Entrada, 2, 1),
            movement(pid, MovementKind::Salida, 5, 2),
        ];
        assert!(matches!(
            project(&history),
            Err(InventoryError::InsufficientStock { .. })
        ));
    }

    mod properties {
        use super::*;
        use crate::stock_level::{classify, StockLevel};
        use proptest::prelude::*;

        /// Generate a movement sequence that never dips below zero, plus the
        /// running sum of signed deltas.
        fn valid_history() -> impl Strategy<Value = Vec<(MovementKind, u64)>> {
            proptest::collection::vec((any::<bool>(), 1u64..1_000), 0..64).prop_map(|steps| {
                let mut balance = 0u64;
                steps
                    .into_iter()
                    .map(|(entrada, qty)| {
                        if entrada || balance < qty {
                            balance += qty;
                            (MovementKind::Entrada, qty)
                        } else {
                            balance -= qty;
                            (MovementKind::Salida, qty)
                        }
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn fold_equals_sum_of_signed_deltas(history in valid_history()) {
                let pid = ProductId::new();
                let movements: Vec<_> = history
                    .iter()
                    .enumerate()
                    .map(|(i, (kind, qty))| movement(pid, *kind, *qty, i as u64 + 1))
                    .collect();

                let folded = project(&movements).unwrap();
                let summed: i128 = movements.iter().map(StockMovement::signed_delta).sum();
                prop_assert_eq!(folded as i128, summed);
            }

            #[test]
            fn classify_is_pure_and_total(quantity in 0u64..1_000_000) {
                let first = classify(quantity);
                let second = classify(quantity);
                prop_assert_eq!(first, second);
                prop_assert!(first.fill_percent >= 10 && first.fill_percent <= 100);
            }

            #[test]
            fn classify_buckets_match_breakpoints(quantity in 0u64..500) {
                let level = classify(quantity).level;
                let expected = if quantity < 50 {
                    StockLevel::Low
                } else if quantity < 100 {
                    StockLevel::Medium
                } else {
                    StockLevel::High
                };
                prop_assert_eq!(level, expected);
            }
        }
    }
}
