//! Cached Companion variable values, per connection

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

#[derive(Debug, Default)]
pub struct VariableStore {
    connections: HashMap<String, Map<String, Value>>,
}

impl VariableStore {
    /// Merge a `queryVariables` result (`{connection: {name: value}}`).
    pub fn merge_snapshot(&mut self, snapshot: &Map<String, Value>) {
        for (connection, variables) in snapshot {
            if let Value::Object(variables) = variables {
                self.apply(connection, variables);
            }
        }
    }

    /// Apply updates for one connection. Returns true if any variable name
    /// was not known before.
    pub fn apply(&mut self, connection: &str, updates: &Map<String, Value>) -> bool {
        let known = self.connections.entry(connection.to_string()).or_default();
        let mut created = false;
        for (name, value) in updates {
            created |= known.insert(name.clone(), value.clone()).is_none();
        }
        created
    }

    pub fn get(&self, connection: &str, variable: &str) -> Option<&Value> {
        self.connections.get(connection)?.get(variable)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Sorted variable names for every connection that has any.
    pub fn names(&self) -> BTreeMap<String, Vec<String>> {
        self.connections
            .iter()
            .filter(|(_, vars)| !vars.is_empty())
            .map(|(connection, vars)| {
                let mut names: Vec<String> = vars.keys().cloned().collect();
                names.sort();
                (connection.clone(), names)
            })
            .collect()
    }
}
