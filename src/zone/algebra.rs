use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One boolean operator in a zone algebra row.
///
/// The accumulator is on the left except for `RightSubtraction`, which
/// replaces the accumulator with `object - accumulator`. The wire names
/// match the project file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "union")]
    Union,
    #[serde(rename = "intersection")]
    Intersection,
    #[serde(rename = "left-subtraction")]
    LeftSubtraction,
    #[serde(rename = "right-subtraction")]
    RightSubtraction,
}

/// One step of a zone algebra row: apply `operation` between the row
/// accumulator and the primitive identified by `object_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub object_id: Uuid,
    pub operation: Operator,
}

impl Operation {
    pub fn union(object_id: Uuid) -> Self {
        Self {
            object_id,
            operation: Operator::Union,
        }
    }

    pub fn intersection(object_id: Uuid) -> Self {
        Self {
            object_id,
            operation: Operator::Intersection,
        }
    }

    pub fn left_subtraction(object_id: Uuid) -> Self {
        Self {
            object_id,
            operation: Operator::LeftSubtraction,
        }
    }

    pub fn right_subtraction(object_id: Uuid) -> Self {
        Self {
            object_id,
            operation: Operator::RightSubtraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_wire_names() {
        let op = Operation::left_subtraction(Uuid::nil());
        let json = serde_json::to_value(op).unwrap();
        assert_eq!(json["operation"], "left-subtraction");
        assert_eq!(json["objectId"], Uuid::nil().to_string());

        let back: Operation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }
}
