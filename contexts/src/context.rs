// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Defines the formal context: a set of objects, a set of attributes and the incidence
//! relation between them, together with the derivation (prime) operators.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use thiserror::Error;

use crate::hashmap::HashMap;
use crate::sets::{AttrSet, BitSet, ObjSet};

/// Identifiers usable as objects or attributes of a [`FormalContext`].
pub trait Element: Clone + Eq + Hash + Ord + Debug + Display {}

impl<T: Clone + Eq + Hash + Ord + Debug + Display> Element for T {}

/// A lookup or construction failure in a [`FormalContext`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContextError {
    /// The object is not part of the context
    #[error("unknown object {0}")]
    UnknownObject(String),
    /// The attribute is not part of the context
    #[error("unknown attribute {0}")]
    UnknownAttribute(String),
    /// An explicit object enumeration listed the same object twice
    #[error("object {0} is listed more than once")]
    DuplicateObject(String),
    /// An explicit attribute enumeration listed the same attribute twice
    #[error("attribute {0} is listed more than once")]
    DuplicateAttribute(String),
}

/// A formal context over objects `O` and attributes `A`.
///
/// Objects keep their insertion order. Attributes are kept sorted in reverse natural order;
/// this order is load-bearing, since it defines the lectic order of attribute sets used by
/// the lattice and basis algorithms. The context is immutable once built.
#[derive(Clone, Debug)]
pub struct FormalContext<O: Element, A: Element> {
    objects: Vec<O>,
    attributes: Vec<A>,
    object_ids: HashMap<O, usize>,
    attribute_ids: HashMap<A, usize>,
    /// object index => attributes of that object
    object_attrs: Vec<AttrSet>,
    /// attribute index => objects having that attribute
    attr_objects: Vec<ObjSet>,
}

fn enumerate_unique<T: Element>(
    explicit: Option<Vec<T>>,
    duplicate: impl Fn(&T) -> ContextError,
) -> Result<Vec<T>, ContextError> {
    let mut seen = crate::hashmap::HashSet::default();
    let items = explicit.unwrap_or_default();
    for item in &items {
        if !seen.insert(item.clone()) {
            return Err(duplicate(item));
        }
    }
    Ok(items)
}

impl<O: Element, A: Element> FormalContext<O, A> {
    /// Build a context from a relation given as `(object, attribute)` pairs.
    ///
    /// Repeated pairs are ignored. If `objects` or `attributes` are supplied they are used
    /// as the initial enumeration, and anything else mentioned by the relation is appended
    /// in order of first occurrence.
    pub fn new<I>(
        relation: I,
        objects: Option<Vec<O>>,
        attributes: Option<Vec<A>>,
    ) -> Result<Self, ContextError>
    where
        I: IntoIterator<Item = (O, A)>,
    {
        let mut objects =
            enumerate_unique(objects, |o| ContextError::DuplicateObject(o.to_string()))?;
        let mut attributes = enumerate_unique(attributes, |a| {
            ContextError::DuplicateAttribute(a.to_string())
        })?;

        let relation: Vec<(O, A)> = relation.into_iter().collect();
        let mut object_ids: HashMap<O, usize> = objects
            .iter()
            .enumerate()
            .map(|(i, o)| (o.clone(), i))
            .collect();
        let mut seen_attributes: crate::hashmap::HashSet<A> = attributes.iter().cloned().collect();
        for (obj, att) in &relation {
            if !object_ids.contains_key(obj) {
                object_ids.insert(obj.clone(), objects.len());
                objects.push(obj.clone());
            }
            if seen_attributes.insert(att.clone()) {
                attributes.push(att.clone());
            }
        }

        attributes.sort_by(|a, b| b.cmp(a));
        let attribute_ids: HashMap<A, usize> = attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.clone(), i))
            .collect();

        let mut object_attrs = vec![BitSet::empty(attributes.len()); objects.len()];
        let mut attr_objects = vec![BitSet::empty(objects.len()); attributes.len()];
        for (obj, att) in &relation {
            let o = object_ids[obj];
            let a = attribute_ids[att];
            object_attrs[o].insert(a);
            attr_objects[a].insert(o);
        }

        Ok(FormalContext {
            objects,
            attributes,
            object_ids,
            attribute_ids,
            object_attrs,
            attr_objects,
        })
    }

    /// Build a context whose objects and attributes are exactly those mentioned by `relation`.
    pub fn from_relation<I>(relation: I) -> Self
    where
        I: IntoIterator<Item = (O, A)>,
    {
        match Self::new(relation, None, None) {
            Ok(context) => context,
            Err(_) => unreachable!("derived enumerations contain no duplicates"),
        }
    }

    /// The objects, in insertion order.
    pub fn objects(&self) -> &[O] {
        &self.objects
    }

    /// The attributes, in the fixed order defining the lectic order.
    pub fn attributes(&self) -> &[A] {
        &self.attributes
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn object_id(&self, obj: &O) -> Result<usize, ContextError> {
        self.object_ids
            .get(obj)
            .copied()
            .ok_or_else(|| ContextError::UnknownObject(obj.to_string()))
    }

    pub fn attribute_id(&self, att: &A) -> Result<usize, ContextError> {
        self.attribute_ids
            .get(att)
            .copied()
            .ok_or_else(|| ContextError::UnknownAttribute(att.to_string()))
    }

    /// Translate attribute identifiers into an attribute set.
    pub fn attr_set<'a, I>(&self, atts: I) -> Result<AttrSet, ContextError>
    where
        I: IntoIterator<Item = &'a A>,
        A: 'a,
    {
        let mut set = self.no_attributes();
        for att in atts {
            set.insert(self.attribute_id(att)?);
        }
        Ok(set)
    }

    /// Translate object identifiers into an object set.
    pub fn obj_set<'a, I>(&self, objs: I) -> Result<ObjSet, ContextError>
    where
        I: IntoIterator<Item = &'a O>,
        O: 'a,
    {
        let mut set = self.no_objects();
        for obj in objs {
            set.insert(self.object_id(obj)?);
        }
        Ok(set)
    }

    /// The identifiers of the attributes in `set`, in attribute order.
    pub fn attribute_names(&self, set: &AttrSet) -> Vec<&A> {
        set.iter().map(|a| &self.attributes[a]).collect()
    }

    /// The identifiers of the objects in `set`, in object order.
    pub fn object_names(&self, set: &ObjSet) -> Vec<&O> {
        set.iter().map(|o| &self.objects[o]).collect()
    }

    pub fn all_attributes(&self) -> AttrSet {
        BitSet::full(self.attributes.len())
    }

    pub fn no_attributes(&self) -> AttrSet {
        BitSet::empty(self.attributes.len())
    }

    pub fn all_objects(&self) -> ObjSet {
        BitSet::full(self.objects.len())
    }

    pub fn no_objects(&self) -> ObjSet {
        BitSet::empty(self.objects.len())
    }

    /// The attributes of a single object.
    pub fn object_row(&self, obj: usize) -> &AttrSet {
        &self.object_attrs[obj]
    }

    /// The objects having a single attribute.
    pub fn attribute_column(&self, att: usize) -> &ObjSet {
        &self.attr_objects[att]
    }

    /// The attributes shared by all objects in `objs`; all attributes if `objs` is empty.
    pub fn objects_prime(&self, objs: &ObjSet) -> AttrSet {
        let mut out = self.all_attributes();
        for o in objs.iter() {
            out.intersect_with(&self.object_attrs[o]);
        }
        out
    }

    /// The objects having every attribute in `atts`; all objects if `atts` is empty.
    pub fn attributes_prime(&self, atts: &AttrSet) -> ObjSet {
        let mut out = self.all_objects();
        for a in atts.iter() {
            out.intersect_with(&self.attr_objects[a]);
        }
        out
    }

    /// Narrow a candidate intent to the attributes of a single object.
    pub fn update_intent(&self, intent: &AttrSet, obj: usize) -> AttrSet {
        intent.intersection(&self.object_attrs[obj])
    }

    /// Narrow a candidate extent to the objects of a single attribute.
    pub fn update_extent(&self, extent: &ObjSet, att: usize) -> ObjSet {
        extent.intersection(&self.attr_objects[att])
    }

    /// The sorted positions of the given attributes, i.e., the lectic sort key of the set.
    pub fn index_list<'a, I>(&self, atts: I) -> Result<Vec<usize>, ContextError>
    where
        I: IntoIterator<Item = &'a A>,
        A: 'a,
    {
        Ok(self.attr_set(atts)?.iter().collect())
    }

    /// The closure `atts''` of an attribute set.
    pub fn intent_closure(&self, atts: &AttrSet) -> AttrSet {
        self.objects_prime(&self.attributes_prime(atts))
    }

    /// The closure `objs''` of an object set.
    pub fn extent_closure(&self, objs: &ObjSet) -> ObjSet {
        self.attributes_prime(&self.objects_prime(objs))
    }

    /// Whether `atts` is the intent of some concept.
    pub fn is_intent(&self, atts: &AttrSet) -> bool {
        &self.intent_closure(atts) == atts
    }

    /// The closure of `atts` in the context restricted to its first `k` attributes.
    ///
    /// `atts` must itself lie within the first `k` attributes.
    pub fn restricted_closure(&self, atts: &AttrSet, k: usize) -> AttrSet {
        let mut closure = BitSet::prefix(self.attributes.len(), k);
        for row in &self.object_attrs {
            if &closure == atts {
                break;
            }
            if atts.is_subset(row) {
                closure.intersect_with(row);
            }
        }
        closure
    }
}
