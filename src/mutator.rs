//! Descriptor mutation: `defineProperty` and the integrity levels
//! (`preventExtensions`, `seal`, `freeze`)
//!
//! Integrity levels only ever tighten. Nothing here can make an object
//! extensible again or a non-configurable property configurable.

use crate::error::ModelError;
use crate::object::ObjectId;
use crate::property::{DescriptorPatch, PropertyDescriptor, PropertyKey};
use crate::realm::Realm;

impl Realm {
    /// `Object.defineProperty`
    ///
    /// A new property gets `false`/`undefined` for every attribute the patch
    /// leaves out. An existing property keeps them. Changes a
    /// non-configurable property does not allow fail with `TypeConflict`.
    pub fn define_property(
        &mut self,
        obj: ObjectId,
        key: impl Into<PropertyKey>,
        patch: DescriptorPatch,
    ) -> Result<(), ModelError> {
        let key = key.into();
        check_patch_shape(&key, &patch)?;

        let record = self.graph.record_mut(obj)?;
        match record.properties.get_own_mut(&key) {
            None => {
                if !record.is_extensible() {
                    return self.reject_write(&key, "object is not extensible");
                }
                record.properties.set_own(key, patch.to_new_descriptor());
            }
            Some(current) => {
                if let Some(reason) = redefinition_conflict(current, &patch) {
                    tracing::debug!(%key, object = %obj, reason, "rejected redefinition");
                    return Err(ModelError::type_conflict(&key, reason));
                }
                patch.apply_to(current);
            }
        }
        Ok(())
    }

    /// `Object.defineProperties`: every patch is checked for shape before
    /// any is applied; patches then apply in order and the first conflict
    /// stops the rest
    pub fn define_properties<K>(
        &mut self,
        obj: ObjectId,
        patches: impl IntoIterator<Item = (K, DescriptorPatch)>,
    ) -> Result<(), ModelError>
    where
        K: Into<PropertyKey>,
    {
        let patches: Vec<(PropertyKey, DescriptorPatch)> = patches
            .into_iter()
            .map(|(key, patch)| (key.into(), patch))
            .collect();
        for (key, patch) in &patches {
            check_patch_shape(key, patch)?;
        }
        for (key, patch) in patches {
            self.define_property(obj, key, patch)?;
        }
        Ok(())
    }

    /// `Object.preventExtensions`
    pub fn prevent_extensions(&mut self, obj: ObjectId) -> Result<(), ModelError> {
        self.graph.record_mut(obj)?.prevent_extensions();
        tracing::debug!(object = %obj, "prevented extensions");
        Ok(())
    }

    /// `Object.seal`: no new properties, every own property non-configurable.
    /// Values stay writable.
    pub fn seal(&mut self, obj: ObjectId) -> Result<(), ModelError> {
        let record = self.graph.record_mut(obj)?;
        record.prevent_extensions();
        for desc in record.properties.descriptors_mut() {
            desc.set_configurable(false);
        }
        tracing::debug!(object = %obj, "sealed");
        Ok(())
    }

    /// `Object.freeze`: seal, then make every own data property read-only.
    /// Accessors keep working; their setters can still run.
    pub fn freeze(&mut self, obj: ObjectId) -> Result<(), ModelError> {
        let record = self.graph.record_mut(obj)?;
        record.prevent_extensions();
        for desc in record.properties.descriptors_mut() {
            desc.set_configurable(false);
            desc.set_writable(false);
        }
        tracing::debug!(object = %obj, "frozen");
        Ok(())
    }

    pub fn is_extensible(&self, obj: ObjectId) -> Result<bool, ModelError> {
        Ok(self.graph.record(obj)?.is_extensible())
    }

    /// Non-extensible with no configurable own property
    pub fn is_sealed(&self, obj: ObjectId) -> Result<bool, ModelError> {
        let record = self.graph.record(obj)?;
        Ok(!record.is_extensible()
            && record
                .properties
                .iter()
                .all(|(_, desc)| !desc.configurable()))
    }

    /// Sealed, and no own data property is writable
    pub fn is_frozen(&self, obj: ObjectId) -> Result<bool, ModelError> {
        let record = self.graph.record(obj)?;
        Ok(!record.is_extensible()
            && record
                .properties
                .iter()
                .all(|(_, desc)| !desc.configurable() && desc.writable() != Some(true)))
    }

    /// The `delete` operator. A missing key counts as deleted. A
    /// non-configurable property stays put and the result is `false`.
    pub fn delete_property(
        &mut self,
        obj: ObjectId,
        key: impl Into<PropertyKey>,
    ) -> Result<bool, ModelError> {
        let key = key.into();
        let record = self.graph.record_mut(obj)?;
        match record.properties.get_own(&key) {
            None => Ok(true),
            Some(desc) if desc.configurable() => {
                record.properties.remove(&key);
                Ok(true)
            }
            Some(_) => {
                tracing::trace!(%key, object = %obj, "delete of non-configurable property refused");
                Ok(false)
            }
        }
    }
}

fn check_patch_shape(key: &PropertyKey, patch: &DescriptorPatch) -> Result<(), ModelError> {
    if patch.is_data() && patch.is_accessor() {
        return Err(ModelError::type_conflict(
            key,
            "a descriptor cannot specify both accessors and a value or writable attribute",
        ));
    }
    Ok(())
}

/// What, if anything, forbids applying `patch` to `current`
fn redefinition_conflict(
    current: &PropertyDescriptor,
    patch: &DescriptorPatch,
) -> Option<&'static str> {
    if current.configurable() {
        return None;
    }
    if patch.configurable == Some(true) {
        return Some("property is not configurable");
    }
    if patch
        .enumerable
        .is_some_and(|flag| flag != current.enumerable())
    {
        return Some("cannot change enumerability of a non-configurable property");
    }

    match current {
        PropertyDescriptor::Data {
            value, writable, ..
        } => {
            if patch.is_accessor() {
                return Some("cannot turn a non-configurable data property into an accessor");
            }
            // writable -> non-writable is the one change still allowed
            if !*writable {
                if patch.writable == Some(true) {
                    return Some("cannot make a non-writable property writable");
                }
                if patch
                    .value
                    .as_ref()
                    .is_some_and(|new| !new.same_value(value))
                {
                    return Some("cannot change the value of a non-writable property");
                }
            }
        }
        PropertyDescriptor::Accessor { get, set, .. } => {
            if patch.is_data() {
                return Some("cannot turn a non-configurable accessor into a data property");
            }
            if patch.get.is_some_and(|new| new != *get) {
                return Some("cannot change the getter of a non-configurable property");
            }
            if patch.set.is_some_and(|new| new != *set) {
                return Some("cannot change the setter of a non-configurable property");
            }
        }
    }
    None
}
