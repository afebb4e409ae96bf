use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identifier a type carries in the published standard
/// (e.g., `MD_Identifier`).
///
/// Identifiers keep their standard prefix; the catalog strips the prefix
/// only when computing lookup names, so exclusion sets and diagnostics can
/// still name the exact colliding entry.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeIdentifier(pub String);

impl TypeIdentifier {
    /// Lookup name with the standard prefix stripped.
    ///
    /// Everything up to and including the first underscore goes away
    /// (`MD_Identifier` becomes `Identifier`); identifiers without a prefix
    /// are returned unchanged.
    pub fn normalized(&self) -> &str {
        match self.0.find('_') {
            Some(index) => &self.0[index + 1..],
            None => &self.0,
        }
    }
}

/// Unique key of a concrete type within the cataloged universe.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(pub String);

/// Specification family a candidate type belongs to.
///
/// Known variants keep serialization consistent; `Other` preserves forward
/// compatibility with registries covering additional standards.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Specification {
    Iso19103,
    Iso19107,
    Iso19111,
    Iso19115,
    Iso19115_2,
    Iso19157,
    Other(String),
}

impl Specification {
    pub fn as_str(&self) -> &str {
        match self {
            Specification::Iso19103 => "ISO_19103",
            Specification::Iso19107 => "ISO_19107",
            Specification::Iso19111 => "ISO_19111",
            Specification::Iso19115 => "ISO_19115",
            Specification::Iso19115_2 => "ISO_19115_2",
            Specification::Iso19157 => "ISO_19157",
            Specification::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "ISO_19103" => Specification::Iso19103,
            "ISO_19107" => Specification::Iso19107,
            "ISO_19111" => Specification::Iso19111,
            "ISO_19115" => Specification::Iso19115,
            "ISO_19115_2" => Specification::Iso19115_2,
            "ISO_19157" => Specification::Iso19157,
            other => Specification::Other(other.to_string()),
        }
    }
}

impl Serialize for Specification {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Specification {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

/// Kind of declared type within the standard.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum TypeCategory {
    Interface,
    CodeList,
    Enumeration,
    Exception,
    Other(String),
}

impl TypeCategory {
    pub fn as_str(&self) -> &str {
        match self {
            TypeCategory::Interface => "interface",
            TypeCategory::CodeList => "code_list",
            TypeCategory::Enumeration => "enumeration",
            TypeCategory::Exception => "exception",
            TypeCategory::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "interface" => TypeCategory::Interface,
            "code_list" => TypeCategory::CodeList,
            "enumeration" => TypeCategory::Enumeration,
            "exception" => TypeCategory::Exception,
            other => TypeCategory::Other(other.to_string()),
        }
    }

    /// True for the categories whose members form controlled vocabularies.
    pub fn is_controlled_vocabulary(&self) -> bool {
        matches!(self, TypeCategory::CodeList | TypeCategory::Enumeration)
    }
}

impl Serialize for TypeCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TypeCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}
