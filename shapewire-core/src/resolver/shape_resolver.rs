// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::ensure;
use crate::error::Error;
use crate::fingerprint::Fingerprint;
use crate::serializer::Serializer;
use crate::shape::Shape;

/// A validated shape and its fingerprint, computed once per type.
#[derive(Debug)]
pub struct ResolvedShape {
    pub type_name: &'static str,
    pub shape: Shape,
    pub fingerprint: Fingerprint,
}

impl ResolvedShape {
    fn build<T: Serializer>() -> Result<Self, Error> {
        let shape = T::wire_shape();
        shape
            .validate_root()
            .map_err(Error::enhance_with_type::<T>)?;
        ensure!(
            T::WIRE_ALLOCATES == shape.allocates(),
            Error::enhance_with_type::<T>(Error::invalid_shape(format!(
                "allocating flag {} disagrees with shape {}",
                T::WIRE_ALLOCATES,
                shape
            )))
        );
        let fingerprint = shape.fingerprint();
        Ok(ResolvedShape {
            type_name: std::any::type_name::<T>(),
            shape,
            fingerprint,
        })
    }
}

/// Per-codec cache of resolved shapes.
///
/// Entries are immutable once inserted; concurrent resolutions of the same type
/// keep whichever finished first.
#[derive(Default)]
pub struct ShapeResolver {
    cache: RwLock<HashMap<TypeId, Arc<ResolvedShape>>>,
}

impl ShapeResolver {
    pub fn resolve<T: Serializer>(&self) -> Result<Arc<ResolvedShape>, Error> {
        let type_id = TypeId::of::<T>();
        if let Some(found) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return Ok(found.clone());
        }
        let resolved = Arc::new(ResolvedShape::build::<T>()?);
        debug!(
            type_name = resolved.type_name,
            shape = %resolved.shape,
            fingerprint = %resolved.fingerprint,
            "resolved shape"
        );
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(type_id).or_insert(resolved).clone())
    }

    pub fn len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
