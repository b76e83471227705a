use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// A pet row as stored in the `pets` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub kind: String,            // ⇔ pets.kind (type label shown next to the name)
    pub image: Option<String>,   // ⇔ pets.image (32x32 PNG as data URI)
    pub order: i64,              // ⇔ pets.sort_order
    pub ideal_min_days: Option<u32>,
    pub ideal_max_days: Option<u32>,
}

impl Pet {
    /// `type/name` label used in list headers.
    pub fn label(&self) -> String {
        format!("{}/{}", self.kind, self.name)
    }

    pub fn has_interval(&self) -> bool {
        self.ideal_min_days.is_some() || self.ideal_max_days.is_some()
    }
}

/// Fields accepted when creating a pet. The order key is assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewPet {
    pub name: String,
    pub kind: String,
    pub image: Option<String>,
    pub ideal_min_days: Option<u32>,
    pub ideal_max_days: Option<u32>,
}

impl NewPet {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn with_interval(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.ideal_min_days = min;
        self.ideal_max_days = max;
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        validate_label("name", &self.name)?;
        validate_label("type", &self.kind)?;
        validate_interval(self.ideal_min_days, self.ideal_max_days)
    }
}

/// Partial update. `None` leaves a field untouched; for the optional
/// columns `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct PetChanges {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub image: Option<Option<String>>,
    pub ideal_min_days: Option<Option<u32>>,
    pub ideal_max_days: Option<Option<u32>>,
}

impl PetChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kind.is_none()
            && self.image.is_none()
            && self.ideal_min_days.is_none()
            && self.ideal_max_days.is_none()
    }

    /// Merge the changes over `pet` and validate the result.
    pub fn apply_to(&self, pet: &Pet) -> AppResult<Pet> {
        let mut out = pet.clone();

        if let Some(name) = &self.name {
            out.name = name.clone();
        }
        if let Some(kind) = &self.kind {
            out.kind = kind.clone();
        }
        if let Some(image) = &self.image {
            out.image = image.clone();
        }
        if let Some(min) = self.ideal_min_days {
            out.ideal_min_days = min;
        }
        if let Some(max) = self.ideal_max_days {
            out.ideal_max_days = max;
        }

        validate_label("name", &out.name)?;
        validate_label("type", &out.kind)?;
        validate_interval(out.ideal_min_days, out.ideal_max_days)?;
        Ok(out)
    }
}

fn validate_label(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidPet(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Both bounds must be positive and `min <= max` when both are set.
pub fn validate_interval(min: Option<u32>, max: Option<u32>) -> AppResult<()> {
    if min == Some(0) || max == Some(0) {
        return Err(AppError::InvalidInterval(
            "ideal days must be positive".into(),
        ));
    }

    if let (Some(lo), Some(hi)) = (min, max)
        && lo > hi
    {
        return Err(AppError::InvalidInterval(format!(
            "min days ({lo}) is greater than max days ({hi})"
        )));
    }

    Ok(())
}
