use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    foundation::{
        core::AxisSet,
        error::{ColrError, ColrResult},
        units::Unit,
    },
    variation::{
        scalar::{Scalar, VariableScalar},
        store::{OnlineVarStoreBuilder, VarIdx, VarStore, VarStoreBackend},
    },
};

/// One named field of a variable bundle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VarDescriptor {
    /// Field name, e.g. `Alpha`.
    pub name: String,
    /// Authored value.
    pub value: Scalar,
    /// Storage unit.
    pub unit: Unit,
}

impl VarDescriptor {
    /// Build a descriptor.
    pub fn new(name: impl Into<String>, value: impl Into<Scalar>, unit: Unit) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit,
        }
    }
}

/// Result of a registration: the base offset and each field's default.
#[derive(Clone, Debug, PartialEq)]
pub struct VarBundle {
    /// Index of the first field in the delta-set list.
    pub base: u32,
    /// `(name, default in authored units)`, in registration order.
    pub values: Vec<(String, f64)>,
}

impl VarBundle {
    /// Default of the field called `name`.
    pub fn value(&self, name: &str) -> ColrResult<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| ColrError::lookup(format!("variable bundle has no field '{name}'")))
    }
}

/// Deduplicating front for a variation-store backend.
///
/// Owns the flat delta-set list: every registered field appends one opaque
/// address, and [`VariationPool::finalize`] rewrites the list to physical
/// addresses.
#[derive(Debug)]
pub struct VariationPool<B: VarStoreBackend = OnlineVarStoreBuilder> {
    axes: AxisSet,
    backend: B,
    delta_set: Vec<VarIdx>,
    memo: HashMap<Vec<VarDescriptor>, VarBundle>,
    warnings: Vec<String>,
    finalized: bool,
}

impl VariationPool {
    /// Pool over `axes` with the in-memory store builder.
    pub fn new(axes: AxisSet) -> Self {
        let backend = OnlineVarStoreBuilder::new(axes.clone());
        Self::with_backend(axes, backend)
    }
}

impl<B: VarStoreBackend> VariationPool<B> {
    /// Pool over `axes` with a caller-supplied backend.
    pub fn with_backend(axes: AxisSet, backend: B) -> Self {
        Self {
            axes,
            backend,
            delta_set: Vec::new(),
            memo: HashMap::new(),
            warnings: Vec::new(),
            finalized: false,
        }
    }

    /// Active axes.
    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    /// Register a bundle of fields; equal bundles share one base offset.
    pub fn register(&mut self, descriptors: Vec<VarDescriptor>) -> ColrResult<VarBundle> {
        if self.finalized {
            return Err(ColrError::consistency(
                "cannot register variable fields after the pool was finalized",
            ));
        }
        if let Some(bundle) = self.memo.get(&descriptors) {
            debug!(base = bundle.base, fields = descriptors.len(), "reusing variable bundle");
            return Ok(bundle.clone());
        }

        let base = u32::try_from(self.delta_set.len())
            .map_err(|_| ColrError::range("delta-set list overflows 32-bit offsets"))?;
        let mut values = Vec::with_capacity(descriptors.len());
        for d in &descriptors {
            let (scalar, warning) = VariableScalar::from_scalar(&d.value, d.unit, &self.axes)?;
            if let Some(w) = warning {
                warn!(field = %d.name, "{w}");
                self.warnings.push(w);
            }
            let (default, idx) = self.backend.submit(&scalar).map_err(|e| match e {
                ColrError::Range(msg) => ColrError::range(format!("{}: {msg}", d.name)),
                other => other,
            })?;
            self.delta_set.push(idx);
            values.push((d.name.clone(), d.unit.decode(default)));
        }

        let bundle = VarBundle { base, values };
        self.memo.insert(descriptors, bundle.clone());
        Ok(bundle)
    }

    /// The delta-set list: opaque addresses before finalize, physical after.
    pub fn delta_set(&self) -> &[VarIdx] {
        &self.delta_set
    }

    /// Deprecation warnings collected so far.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Finish and optimize the store, remapping the delta-set list in place.
    pub fn finalize(&mut self) -> ColrResult<VarStore> {
        if self.finalized {
            return Err(ColrError::consistency("variation pool finalized twice"));
        }
        let mut store = self.backend.finish();
        let mapping = store.optimize();
        for idx in &mut self.delta_set {
            *idx = *mapping.get(idx).ok_or_else(|| {
                ColrError::lookup(format!("optimized store lost address {idx:#010x}"))
            })?;
        }
        self.finalized = true;
        debug!(
            entries = self.delta_set.len(),
            regions = store.regions.len(),
            blocks = store.data.len(),
            "variation pool finalized"
        );
        Ok(store)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/variation/pool.rs"]
mod tests;
