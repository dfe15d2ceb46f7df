//! The resolved, queryable index of object names and variable codes.

use super::error::{Result, SwmmError};
use super::models::{ObjectKind, ObjectProperty, ResolvedRequest, SeriesRequest};
use super::models::FormatVersion;
use super::varcode;

/// Immutable catalog built once while parsing the header.
///
/// Indexes are positions in the name tables and are stable for the
/// session's lifetime. Names are not required to be unique; lookups
/// resolve to the first match.
#[derive(Debug)]
pub struct Catalog {
    format_version: FormatVersion,
    /// Name tables indexed by `ObjectKind::code()`. System "names" are the
    /// labels of the declared system variable codes.
    names: [Vec<String>; 5],
    /// Declared variable-code lists indexed by `ObjectKind::code()`.
    /// Pollutant carries the implicit single code 0.
    var_codes: [Vec<i32>; 5],
    /// Concentration-unit code per pollutant, as stored in the header.
    pollutant_units: Vec<i32>,
    /// Property-code tables for subcatchment/node/link.
    property_codes: [Vec<i32>; 3],
    /// Per-object property values for subcatchment/node/link.
    properties: [Vec<Vec<ObjectProperty>>; 3],
}

impl Catalog {
    pub(crate) fn new(
        format_version: FormatVersion,
        names: [Vec<String>; 5],
        var_codes: [Vec<i32>; 5],
        pollutant_units: Vec<i32>,
        property_codes: [Vec<i32>; 3],
        properties: [Vec<Vec<ObjectProperty>>; 3],
    ) -> Self {
        Self {
            format_version,
            names,
            var_codes,
            pollutant_units,
            property_codes,
            properties,
        }
    }

    /// Ordered object names for a kind.
    pub fn names(&self, kind: ObjectKind) -> &[String] {
        &self.names[kind.code()]
    }

    /// Declared variable codes for a kind, in record order.
    pub fn var_codes(&self, kind: ObjectKind) -> &[i32] {
        &self.var_codes[kind.code()]
    }

    /// Concentration-unit code per pollutant.
    pub fn pollutant_units(&self) -> &[i32] {
        &self.pollutant_units
    }

    /// Resolve an object name to its index within its kind.
    pub fn resolve(&self, kind: ObjectKind, name: &str) -> Result<usize> {
        self.names(kind)
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| SwmmError::NameNotFound {
                kind,
                name: name.to_string(),
            })
    }

    /// Validate a series request and fix its item index.
    ///
    /// Fails before any I/O: unknown names and out-of-range variable
    /// indices never reach the file. The system block is a single implicit
    /// item, so system requests always resolve to item index 0.
    pub fn resolve_request(&self, request: &SeriesRequest) -> Result<ResolvedRequest> {
        if !ObjectKind::REPORTED.contains(&request.kind) {
            return Err(SwmmError::NoSeriesForKind(request.kind));
        }
        let resolved = self.resolve(request.kind, &request.name)?;
        let item_index = match request.kind {
            ObjectKind::System => 0,
            _ => resolved,
        };
        let available = self.var_codes(request.kind).len();
        if request.var_index >= available {
            return Err(SwmmError::VariableOutOfRange {
                kind: request.kind,
                index: request.var_index,
                available,
            });
        }
        Ok(ResolvedRequest {
            kind: request.kind,
            item_index,
            var_index: request.var_index,
        })
    }

    /// Ordered `(code, label)` pairs for every variable a kind reports.
    ///
    /// For subcatchments, nodes, and links the pollutant concentration
    /// variables appear after the native list, labeled with the pollutant
    /// names and with codes continuing numerically.
    pub fn variables(&self, kind: ObjectKind) -> Vec<(i32, String)> {
        if kind == ObjectKind::Pollutant {
            // Pollutants have one implicit variable: the concentration itself.
            return self
                .var_codes(kind)
                .iter()
                .map(|&code| (code, "Concentration".to_string()))
                .collect();
        }
        self.var_codes(kind)
            .iter()
            .map(|&code| (code, self.label_for_code(kind, code)))
            .collect()
    }

    /// Label for a variable code of a kind, consulting the pollutant names
    /// past the end of the native table.
    pub fn label_for_code(&self, kind: ObjectKind, code: i32) -> String {
        let native = varcode::native_labels(self.format_version, kind);
        if code >= 0 {
            if let Some(label) = native.get(code as usize) {
                return (*label).to_string();
            }
            if matches!(
                kind,
                ObjectKind::Subcatchment | ObjectKind::Node | ObjectKind::Link
            ) {
                let appended = code as usize - native.len();
                if let Some(pollutant) = self.names(ObjectKind::Pollutant).get(appended) {
                    return pollutant.clone();
                }
            }
        }
        code.to_string()
    }

    /// Label for the variable at a declared index of a kind.
    ///
    /// The label comes from the code stored at that index, not from the
    /// index itself; the two coincide in files written by the simulator
    /// but the format does not promise it.
    pub fn var_label(&self, kind: ObjectKind, var_index: usize) -> String {
        match self.var_codes(kind).get(var_index) {
            Some(&code) => self.label_for_code(kind, code),
            None => var_index.to_string(),
        }
    }

    /// Declared property codes for subcatchment, node, or link.
    pub fn property_codes(&self, kind: ObjectKind) -> Result<&[i32]> {
        Self::property_slot(kind).map(|slot| self.property_codes[slot].as_slice())
    }

    /// Property values for one object, as `(code, value)` pairs.
    pub fn properties(&self, kind: ObjectKind, item_index: usize) -> Result<&[ObjectProperty]> {
        let slot = Self::property_slot(kind)?;
        self.properties[slot]
            .get(item_index)
            .map(Vec::as_slice)
            .ok_or_else(|| SwmmError::NameNotFound {
                kind,
                name: format!("#{item_index}"),
            })
    }

    fn property_slot(kind: ObjectKind) -> Result<usize> {
        match kind {
            ObjectKind::Subcatchment | ObjectKind::Node | ObjectKind::Link => Ok(kind.code()),
            other => Err(SwmmError::NoPropertiesForKind(other)),
        }
    }
}
