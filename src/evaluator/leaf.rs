use crate::error::FilterError;
use crate::filter::Operand;

/// Resolves which side of an equality leaf names the column and which holds
/// the literal. Returns `(column, value)`.
pub(super) fn resolve_direction<'o>(
    left: &'o Operand,
    right: &'o Operand,
) -> Result<(&'o str, &'o str), FilterError> {
    match (left, right) {
        (Operand::Column { name }, Operand::Literal { value })
        | (Operand::Literal { value }, Operand::Column { name }) => Ok((name, value)),
        _ => Err(FilterError::MalformedLeaf {
            found: format!("{} = {}", left, right),
        }),
    }
}
