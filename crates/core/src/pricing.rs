//! Apartment pricing: quote types and pure price computation.
//!
//! A quote is a tagged union over the property type. Residential units
//! (apartment, duplex, villa) price each surface component separately;
//! stores add an optional mezzanine; land is a single surface. Both pricing
//! modes (flat `FIXE` price or per-square-meter `M2`) share the same
//! commission rule: `commission_per_m2` applied over the summed surfaces
//! of the variant.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::validate_non_negative;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Upper bound for the balcony/terrace percentage multipliers.
pub const MAX_SURFACE_PCT: f64 = 100.0;

// ---------------------------------------------------------------------------
// Pricing mode
// ---------------------------------------------------------------------------

/// How the main surface is priced: a flat total or a per-square-meter rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceBasis {
    /// Flat total price for the unit; surface components are not itemized.
    Fixe { price: f64 },
    /// Per-square-meter rate applied to each surface component.
    M2 { price_per_m2: f64 },
}

// ---------------------------------------------------------------------------
// Quote input types
// ---------------------------------------------------------------------------

/// Optional parking lot attached to a residential unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkingQuote {
    pub price: f64,
    /// When true the parking is bundled into the unit price and not billed.
    #[serde(default)]
    pub included: bool,
}

/// Surfaces and rates for an apartment, duplex, or villa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentialQuote {
    pub habitable_surface: f64,
    #[serde(default)]
    pub balcony_surface: f64,
    #[serde(default)]
    pub terrace_surface: f64,
    #[serde(default)]
    pub pool_surface: f64,
    /// Percent of the habitable m² price billed for balcony surface (0-100).
    #[serde(default)]
    pub balcony_pct: f64,
    /// Percent of the habitable m² price billed for terrace surface (0-100).
    #[serde(default)]
    pub terrace_pct: f64,
    /// Pools are billed at their own rate, not a percentage of the m² price.
    #[serde(default)]
    pub pool_price_per_m2: f64,
    #[serde(default)]
    pub parking: Option<ParkingQuote>,
    #[serde(default)]
    pub commission_per_m2: f64,
    #[serde(flatten)]
    pub basis: PriceBasis,
}

/// Mezzanine level of a store, billed at its own rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MezzanineQuote {
    pub area: f64,
    pub price_per_m2: f64,
}

/// Surfaces and rates for a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreQuote {
    pub area: f64,
    #[serde(default)]
    pub mezzanine: Option<MezzanineQuote>,
    #[serde(default)]
    pub commission_per_m2: f64,
    #[serde(flatten)]
    pub basis: PriceBasis,
}

/// Surface and rates for a land parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandQuote {
    pub area: f64,
    #[serde(default)]
    pub commission_per_m2: f64,
    #[serde(flatten)]
    pub basis: PriceBasis,
}

/// A pricing request, tagged by the property type it prices.
///
/// The three residential variants share one shape; stores and land have
/// their own. The tag matches the `property_type` enum stored on
/// apartment rows, so a quote can be submitted alongside a create/update
/// payload without renaming fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteRequest {
    Apartment(ResidentialQuote),
    Duplex(ResidentialQuote),
    Villa(ResidentialQuote),
    Store(StoreQuote),
    Land(LandQuote),
}

// ---------------------------------------------------------------------------
// Breakdown output
// ---------------------------------------------------------------------------

/// Itemized price components. Components that do not apply to the quoted
/// variant or mode are zero, so the shape is stable across all quotes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Main surface component (or the flat price in `FIXE` mode).
    pub habitable: f64,
    pub balcony: f64,
    pub terrace: f64,
    pub pool: f64,
    pub parking: f64,
    pub mezzanine: f64,
    pub commission: f64,
    pub total: f64,
}

impl PriceBreakdown {
    fn finish(mut self) -> Self {
        self.total = self.habitable
            + self.balcony
            + self.terrace
            + self.pool
            + self.parking
            + self.mezzanine
            + self.commission;
        self
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute an itemized price for a quote.
///
/// Pure and deterministic: the same request always produces the same
/// breakdown. Negative surfaces or rates and out-of-range percentages are
/// rejected with [`CoreError::Validation`] before any arithmetic is done.
pub fn compute_price(quote: &QuoteRequest) -> Result<PriceBreakdown, CoreError> {
    match quote {
        QuoteRequest::Apartment(q) | QuoteRequest::Duplex(q) | QuoteRequest::Villa(q) => {
            residential_price(q)
        }
        QuoteRequest::Store(q) => store_price(q),
        QuoteRequest::Land(q) => land_price(q),
    }
}

fn validate_basis(basis: &PriceBasis) -> Result<(), CoreError> {
    match basis {
        PriceBasis::Fixe { price } => validate_non_negative("Price", *price),
        PriceBasis::M2 { price_per_m2 } => {
            validate_non_negative("Price per m2", *price_per_m2)
        }
    }
}

fn validate_pct(field: &'static str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || !(0.0..=MAX_SURFACE_PCT).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{field} must be between 0 and 100"
        )));
    }
    Ok(())
}

fn residential_price(q: &ResidentialQuote) -> Result<PriceBreakdown, CoreError> {
    validate_non_negative("Habitable surface", q.habitable_surface)?;
    validate_non_negative("Balcony surface", q.balcony_surface)?;
    validate_non_negative("Terrace surface", q.terrace_surface)?;
    validate_non_negative("Pool surface", q.pool_surface)?;
    validate_pct("Balcony percentage", q.balcony_pct)?;
    validate_pct("Terrace percentage", q.terrace_pct)?;
    validate_non_negative("Pool price per m2", q.pool_price_per_m2)?;
    validate_non_negative("Commission per m2", q.commission_per_m2)?;
    if let Some(parking) = &q.parking {
        validate_non_negative("Parking price", parking.price)?;
    }
    validate_basis(&q.basis)?;

    let chargeable =
        q.habitable_surface + q.balcony_surface + q.terrace_surface + q.pool_surface;
    let mut breakdown = PriceBreakdown {
        commission: q.commission_per_m2 * chargeable,
        ..PriceBreakdown::default()
    };

    match q.basis {
        PriceBasis::Fixe { price } => {
            breakdown.habitable = price;
        }
        PriceBasis::M2 { price_per_m2 } => {
            breakdown.habitable = q.habitable_surface * price_per_m2;
            breakdown.balcony = q.balcony_surface * price_per_m2 * q.balcony_pct / 100.0;
            breakdown.terrace = q.terrace_surface * price_per_m2 * q.terrace_pct / 100.0;
            breakdown.pool = q.pool_surface * q.pool_price_per_m2;
            if let Some(parking) = &q.parking {
                if !parking.included {
                    breakdown.parking = parking.price;
                }
            }
        }
    }

    Ok(breakdown.finish())
}

fn store_price(q: &StoreQuote) -> Result<PriceBreakdown, CoreError> {
    validate_non_negative("Area", q.area)?;
    validate_non_negative("Commission per m2", q.commission_per_m2)?;
    if let Some(mezzanine) = &q.mezzanine {
        validate_non_negative("Mezzanine area", mezzanine.area)?;
        validate_non_negative("Mezzanine price per m2", mezzanine.price_per_m2)?;
    }
    validate_basis(&q.basis)?;

    let mezzanine_area = q.mezzanine.map(|m| m.area).unwrap_or(0.0);
    let mut breakdown = PriceBreakdown {
        commission: q.commission_per_m2 * (q.area + mezzanine_area),
        ..PriceBreakdown::default()
    };

    match q.basis {
        PriceBasis::Fixe { price } => {
            breakdown.habitable = price;
        }
        PriceBasis::M2 { price_per_m2 } => {
            breakdown.habitable = q.area * price_per_m2;
            if let Some(mezzanine) = &q.mezzanine {
                breakdown.mezzanine = mezzanine.area * mezzanine.price_per_m2;
            }
        }
    }

    Ok(breakdown.finish())
}

fn land_price(q: &LandQuote) -> Result<PriceBreakdown, CoreError> {
    validate_non_negative("Area", q.area)?;
    validate_non_negative("Commission per m2", q.commission_per_m2)?;
    validate_basis(&q.basis)?;

    let mut breakdown = PriceBreakdown {
        commission: q.commission_per_m2 * q.area,
        ..PriceBreakdown::default()
    };

    match q.basis {
        PriceBasis::Fixe { price } => {
            breakdown.habitable = price;
        }
        PriceBasis::M2 { price_per_m2 } => {
            breakdown.habitable = q.area * price_per_m2;
        }
    }

    Ok(breakdown.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
