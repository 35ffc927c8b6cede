// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value validation.

use crate::domain::problem::{ProblemList, ValueProblem};
use crate::domain::property::PropertyDef;
use crate::domain::value::Value;
use crate::domain::values::LoaderInfo;

/// Runs every validator of a property against a value.
///
/// Validators that are mis-specified, or that cannot check the property's
/// value type, are skipped; they are reported once when the registry is built.
///
/// # Arguments
///
/// * `property` - The property the value belongs to
/// * `value` - The parsed value
/// * `loader` - The loader that supplied the value
/// * `canonical_name` - The property's canonical name, for the report
pub fn validate(
    property: &PropertyDef,
    value: &Value,
    loader: &LoaderInfo,
    canonical_name: &str,
) -> ProblemList {
    property
        .validators()
        .iter()
        .filter(|v| v.is_specification_valid() && v.supports(property.value_type()))
        .filter(|v| !v.is_valid(value))
        .map(|v| ValueProblem::InvalidValue {
            loader: loader.clone(),
            property: canonical_name.to_string(),
            value: value.to_text(),
            validator: v.describe(),
            message: v.invalid_message(value),
        })
        .collect()
}
