use serde::{Deserialize, Serialize};

use crate::dims::BrickDimensions;
use crate::errors::{ErrorInfo, WallError};
use crate::layout::{BrickLayout, CourseSpan};

/// Serializes the layout to a compact binary representation using `bincode`.
pub fn layout_to_bytes(layout: &BrickLayout) -> Result<Vec<u8>, WallError> {
    let serializable = SerializableLayout::from_layout(layout);
    bincode::serialize(&serializable)
        .map_err(|err| WallError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a layout from its binary representation, re-validating every course.
pub fn layout_from_bytes(bytes: &[u8]) -> Result<BrickLayout, WallError> {
    let serializable: SerializableLayout = bincode::deserialize(bytes)
        .map_err(|err| WallError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_layout()
}

/// Serializes the layout to a JSON string.
pub fn layout_to_json(layout: &BrickLayout) -> Result<String, WallError> {
    let serializable = SerializableLayout::from_layout(layout);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| WallError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a layout from a JSON string, re-validating every course.
pub fn layout_from_json(json: &str) -> Result<BrickLayout, WallError> {
    let serializable: SerializableLayout = serde_json::from_str(json)
        .map_err(|err| WallError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_layout()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableLayout {
    dims: BrickDimensions,
    courses: Vec<Vec<CourseSpan>>,
}

impl SerializableLayout {
    fn from_layout(layout: &BrickLayout) -> Self {
        Self {
            dims: *layout.dims(),
            courses: layout.course_spans(),
        }
    }

    fn into_layout(self) -> Result<BrickLayout, WallError> {
        BrickLayout::from_courses(&self.courses, self.dims)
    }
}
