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

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use crate::{
    AvroResult, Error,
    error::Details,
    util::MapHelper,
    validator::{validate_namespace, validate_schema_name},
};

/// Represents names for `record` and `enum` Avro schemas.
///
/// Each of these `Schema`s have a `fullname` composed of two parts:
///   * a name
///   * a namespace
///
/// More information about schema names can be found in the
/// [Avro specification](https://avro.apache.org/docs/++version++/specification/#names)
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct Name {
    /// The full name
    namespace_and_name: String,
    /// Start byte of the name part
    ///
    /// If this is zero, then there is no namespace.
    index_of_name: usize,
}

/// Represents the aliases of a named schema or a record field.
pub type Aliases = Option<Vec<String>>;
/// Represents the namespace of a named schema.
pub type Namespace = Option<String>;
/// Represents a borrowed namespace of a named schema.
pub type NamespaceRef<'a> = Option<&'a str>;

impl Name {
    /// Create a new `Name`.
    ///
    /// A dotted `name` carries its own namespace, e.g. `com.example.Employee`.
    pub fn new(name: impl Into<String> + AsRef<str>) -> AvroResult<Self> {
        Self::new_with_enclosing_namespace(name, None)
    }

    /// Create a new `Name` using `enclosing_namespace` if `name` has no namespace of its own.
    pub fn new_with_enclosing_namespace(
        name: impl Into<String> + AsRef<str>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Self> {
        let name_ref = name.as_ref();
        let index_of_name = validate_schema_name(name_ref)?;

        match enclosing_namespace {
            Some(namespace) if index_of_name == 0 && !namespace.is_empty() => {
                validate_namespace(namespace)?;
                Ok(Self {
                    namespace_and_name: format!("{namespace}.{name_ref}"),
                    index_of_name: namespace.len() + 1,
                })
            }
            // A leading dot means the null namespace
            _ if index_of_name == 1 => Ok(Self {
                namespace_and_name: name_ref[1..].into(),
                index_of_name: 0,
            }),
            _ => Ok(Self {
                namespace_and_name: name.into(),
                index_of_name,
            }),
        }
    }

    /// Parse the `name` and `namespace` attributes of a JSON schema object.
    ///
    /// Without a `namespace` attribute the name inherits `enclosing_namespace`.
    pub(crate) fn parse(
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Self> {
        let name_field = complex.name().ok_or(Details::GetNameField)?;
        let namespace = complex.string("namespace");
        Self::new_with_enclosing_namespace(name_field, namespace.as_deref().or(enclosing_namespace))
    }

    pub fn name(&self) -> &str {
        &self.namespace_and_name[self.index_of_name..]
    }

    pub fn namespace(&self) -> NamespaceRef<'_> {
        if self.index_of_name == 0 {
            None
        } else {
            Some(&self.namespace_and_name[..(self.index_of_name - 1)])
        }
    }

    /// Return the `fullname` of this `Name`, i.e. `namespace.name` or just `name`.
    pub fn fullname(&self) -> &str {
        &self.namespace_and_name
    }

    /// Whether `other` refers to this name, either by its unqualified name or by its fullname.
    pub fn matches(&self, other: &str) -> bool {
        self.name() == other || self.fullname() == other
    }
}

impl TryFrom<&str> for Name {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Name {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Name");
        debug.field("name", &self.name());
        if let Some(namespace) = self.namespace() {
            debug.field("namespace", &namespace);
            debug.finish()
        } else {
            debug.finish_non_exhaustive()
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.namespace_and_name)
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.fullname())
    }
}
