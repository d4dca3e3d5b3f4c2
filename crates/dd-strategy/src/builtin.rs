//! Built-in strategy functions.
//!
//! | Kind       | Name                   | Args          | Dependency |
//! |------------|------------------------|---------------|------------|
//! | Generation | `uniform_distribution` | `low`, `high` | –          |
//! | Generation | `normal_distribution`  | `mean`, `std` | –          |
//! | Generation | `fixed_value`          | `value`       | –          |
//! | Placement  | `random_location`      | –             | count      |
//! | Placement  | `grid_spread`          | –             | count      |
//! | Genetics   | `random_genetics`      | –             | –          |
//!
//! Placement counts are clamped to [`MAX_PLACEMENTS_PER_CELL`] times the
//! number of cells.  The pool cap or the arena decides how many of them are
//! used, so a larger request would only allocate coordinates nobody reads.

use rand_distr::Normal;

use dd_core::{Coordinate, StrategyArgs, StrategyKind};

use crate::error::{StrategyError, StrategyResult};
use crate::registry::{StrategyContext, StrategyRegistry};
use crate::value::StrategyValue;

pub const UNIFORM_DISTRIBUTION: &str = "uniform_distribution";
pub const NORMAL_DISTRIBUTION: &str = "normal_distribution";
pub const FIXED_VALUE: &str = "fixed_value";
pub const RANDOM_LOCATION: &str = "random_location";
pub const GRID_SPREAD: &str = "grid_spread";
pub const RANDOM_GENETICS: &str = "random_genetics";

/// Upper bound on a placement's length, per grid cell.
pub const MAX_PLACEMENTS_PER_CELL: usize = 8;

pub fn register_builtins(registry: &mut StrategyRegistry) {
    registry.register(StrategyKind::Generation, UNIFORM_DISTRIBUTION, |args, _, ctx| {
        uniform_distribution(args, ctx)
    });
    registry.register(StrategyKind::Generation, NORMAL_DISTRIBUTION, |args, _, ctx| {
        normal_distribution(args, ctx)
    });
    registry.register(StrategyKind::Generation, FIXED_VALUE, |args, _, _| fixed_value(args));
    registry.register(StrategyKind::Placement, RANDOM_LOCATION, |_, dep, ctx| {
        random_location(dep, ctx)
    });
    registry.register(StrategyKind::Placement, GRID_SPREAD, |_, dep, ctx| grid_spread(dep, ctx));
    registry.register(StrategyKind::Genetics, RANDOM_GENETICS, |_, _, ctx| {
        Ok(StrategyValue::Genome(ctx.rng.random()))
    });
}

fn required(args: &StrategyArgs, function: &str, argument: &str) -> StrategyResult<f64> {
    args.get(argument).ok_or_else(|| StrategyError::MissingArgument {
        function: function.to_owned(),
        argument: argument.to_owned(),
    })
}

/// Count carried by a placement strategy's dependency.  Negative counts
/// place nothing; the rest are clamped to the placement limit of the grid.
fn dependency_count(dep: Option<&StrategyValue>, function: &str, cells: usize) -> StrategyResult<usize> {
    let dep = dep.ok_or_else(|| StrategyError::MissingArgument {
        function: function.to_owned(),
        argument: "dependency".to_owned(),
    })?;
    let n = dep.as_quantity().ok_or_else(|| StrategyError::InvalidArgument {
        function: function.to_owned(),
        reason: format!("dependency must be a Generation quantity, got {}", dep.kind()),
    })?;
    let limit = cells.saturating_mul(MAX_PLACEMENTS_PER_CELL);
    Ok(usize::try_from(n.max(0)).map_or(limit, |n| n.min(limit)))
}

// ── Generation ────────────────────────────────────────────────────────────────

/// Integer drawn uniformly from `[low, high)`.
pub fn uniform_distribution(args: &StrategyArgs, ctx: &mut StrategyContext<'_>) -> StrategyResult<StrategyValue> {
    let low = required(args, UNIFORM_DISTRIBUTION, "low")?.floor() as i64;
    let high = required(args, UNIFORM_DISTRIBUTION, "high")?.floor() as i64;
    if low >= high {
        return Err(StrategyError::InvalidArgument {
            function: UNIFORM_DISTRIBUTION.to_owned(),
            reason: format!("empty range [{low}, {high})"),
        });
    }
    Ok(StrategyValue::Quantity(ctx.rng.gen_range(low..high)))
}

/// Normal draw rounded to the nearest integer and clamped at zero.
pub fn normal_distribution(args: &StrategyArgs, ctx: &mut StrategyContext<'_>) -> StrategyResult<StrategyValue> {
    let mean = required(args, NORMAL_DISTRIBUTION, "mean")?;
    let std = required(args, NORMAL_DISTRIBUTION, "std")?;
    let dist = Normal::new(mean, std).map_err(|e| StrategyError::InvalidArgument {
        function: NORMAL_DISTRIBUTION.to_owned(),
        reason: e.to_string(),
    })?;
    let x: f64 = ctx.rng.sample(dist);
    Ok(StrategyValue::Quantity(x.round().max(0.0) as i64))
}

pub fn fixed_value(args: &StrategyArgs) -> StrategyResult<StrategyValue> {
    let value = required(args, FIXED_VALUE, "value")?;
    Ok(StrategyValue::Quantity(value.round() as i64))
}

// ── Placement ─────────────────────────────────────────────────────────────────

/// `count` uniformly random cells, drawn with replacement.
pub fn random_location(dep: Option<&StrategyValue>, ctx: &mut StrategyContext<'_>) -> StrategyResult<StrategyValue> {
    let count = dependency_count(dep, RANDOM_LOCATION, ctx.world.cell_count())?;
    let coords = (0..count).map(|_| ctx.world.random_cell(ctx.rng)).collect();
    Ok(StrategyValue::Placement(coords))
}

/// `count` cells spaced evenly through the grid in row-major order.  No
/// randomness.  Asking for more cells than the grid has repeats cells.
pub fn grid_spread(dep: Option<&StrategyValue>, ctx: &mut StrategyContext<'_>) -> StrategyResult<StrategyValue> {
    let cells = ctx.world.cell_count();
    let count = dependency_count(dep, GRID_SPREAD, cells)?;
    let coords: Vec<Coordinate> = (0..count)
        .map(|i| ctx.world.coordinate_at((i * cells / count.max(1)) % cells))
        .collect();
    Ok(StrategyValue::Placement(coords))
}
