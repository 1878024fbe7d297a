//! Constant-product (x·y=k) pool engine.
//!
//! Pools are immutable snapshots. The functions in [`engine`] quote swaps and
//! liquidity operations or return successor snapshots; they never mutate
//! their input and never fail, degrading to zero quotes on bad input.
//!
//! Amounts are fixed-point with 18 fractional digits and all reserve math is
//! carried out on integers, so the invariants hold exactly:
//!
//! ```
//! use cpamm_domain::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let pool = Pool::new(
//!     Token::new("Alpha", "ALPHA", 18),
//!     Token::new("Beta", "BETA", 18),
//!     Percentage::new(Decimal::new(3, 1)),
//! )
//! .unwrap()
//! .with_liquidity(
//!     TokenAmount::from_tokens(1000),
//!     TokenAmount::from_tokens(1000),
//!     TokenAmount::from_tokens(1000),
//! )
//! .unwrap();
//!
//! let outcome = engine::apply_swap(&pool, "10", SwapDirection::AToB);
//! assert_eq!(outcome.amount_out.to_string(), "9.871580343970612988");
//! assert!(outcome.pool.k() > pool.k());
//! ```

pub mod engine;
pub mod enums;
pub mod error;
pub mod math;
pub mod metrics;
pub mod pool;
pub mod prelude;
pub mod token;
pub mod value_objects;
