use std::sync::Arc;

use arrow_array::{Array, FixedSizeListArray, Float64Array};
use arrow_buffer::ScalarBuffer;
use arrow_schema::{DataType, Field};

use crate::buffer::PackedBuffer;
use crate::collection::PointCollection;
use crate::error::{PackedPointsError, Result};
use crate::trait_::IntoArrow;

impl PointCollection {
    /// The live coordinates as one flat array, with holes dropped
    pub fn values_array(&self) -> Float64Array {
        let arr = self.buffer().array();
        let mut values = Vec::with_capacity(self.count());
        for range in self.buffer().ranges() {
            values.extend_from_slice(&arr[range]);
        }
        Float64Array::new(ScalarBuffer::from(values), None)
    }

    /// The non-nullable `Float64` child field, named after the dimension
    pub fn values_field(&self) -> Field {
        let name = match self.dim() {
            2 => "xy",
            3 => "xyz",
            4 => "xyzm",
            _ => "coords",
        };
        Field::new(name, DataType::Float64, false)
    }

    /// Compact the live points into a [`FixedSizeListArray`] with one list per point.
    ///
    /// # Panics
    ///
    /// - if the dimension does not fit in an Arrow list size (`i32`)
    pub fn to_arrow(&self) -> FixedSizeListArray {
        self.try_to_arrow().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Compact the live points into a [`FixedSizeListArray`] with one list per point.
    ///
    /// # Errors
    ///
    /// - if the dimension does not fit in an Arrow list size (`i32`)
    pub fn try_to_arrow(&self) -> Result<FixedSizeListArray> {
        let size = i32::try_from(self.dim())
            .map_err(|_| PackedPointsError::InvalidDimension(self.dim()))?;
        Ok(FixedSizeListArray::try_new(
            Arc::new(self.values_field()),
            size,
            Arc::new(self.values_array()),
            None,
        )?)
    }
}

impl IntoArrow for PointCollection {
    type ArrowArray = FixedSizeListArray;

    fn into_arrow(self) -> Self::ArrowArray {
        self.to_arrow()
    }
}

impl From<PointCollection> for FixedSizeListArray {
    fn from(value: PointCollection) -> Self {
        value.into_arrow()
    }
}

impl TryFrom<&FixedSizeListArray> for PointCollection {
    type Error = PackedPointsError;

    fn try_from(value: &FixedSizeListArray) -> std::result::Result<Self, Self::Error> {
        let dim = usize::try_from(value.value_length())
            .ok()
            .filter(|dim| *dim > 0)
            .ok_or_else(|| {
                PackedPointsError::General(format!(
                    "Expected a positive list size, got {}",
                    value.value_length()
                ))
            })?;

        if value.null_count() > 0 {
            return Err(PackedPointsError::General(
                "Null points cannot be packed".to_string(),
            ));
        }

        let coord_array_values = value
            .values()
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| {
                PackedPointsError::General(format!(
                    "Expected Float64 coordinate values, got {}",
                    value.value_type()
                ))
            })?;
        if coord_array_values.null_count() > 0 {
            return Err(PackedPointsError::General(
                "Null coordinates cannot be packed".to_string(),
            ));
        }

        let buffer: PackedBuffer = coord_array_values.values().to_vec().into();
        PointCollection::try_new(buffer, dim)
    }
}
