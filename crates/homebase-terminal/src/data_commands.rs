//! Store backup and restore commands.

use homebase_types::error::Result;
use serde_json::{Map, Value};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, Options};

/// Register data commands.
pub fn register_data_commands(reg: &mut CommandRegistry) {
    reg.register(Box::new(BackupCmd));
    reg.register(Box::new(RestoreCmd));
}

// ---------------------------------------------------------------------------
// backup
// ---------------------------------------------------------------------------

struct BackupCmd;
impl Command for BackupCmd {
    fn name(&self) -> &str {
        "backup"
    }
    fn help(&self) -> &str {
        "make backup of the store\nusage: backup [ITEM]\n\
         without ITEM the whole store is printed as one JSON object"
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if !argument.is_empty() {
            return Ok(match env.store.get(argument)? {
                Some(value) => {
                    let mut obj = Map::new();
                    obj.insert(argument.to_string(), value);
                    CommandOutput::Json(Value::Object(obj))
                },
                None => CommandOutput::Text(format!("Item '{argument}' not found.")),
            });
        }

        let mut obj = Map::new();
        for key in env.store.keys()? {
            if let Some(value) = env.store.get(&key)? {
                obj.insert(key, value);
            }
        }
        log::debug!("backup of {} items", obj.len());
        Ok(CommandOutput::Json(Value::Object(obj)))
    }
}

// ---------------------------------------------------------------------------
// restore
// ---------------------------------------------------------------------------

struct RestoreCmd;
impl Command for RestoreCmd {
    fn name(&self) -> &str {
        "restore"
    }
    fn help(&self) -> &str {
        "restore store from a backup\nusage: restore JSON\n\
         every top-level key of the object replaces the stored item"
    }
    fn raw_argument(&self) -> bool {
        true
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if argument.is_empty() {
            return Ok(CommandOutput::Text(self.help().to_string()));
        }
        let parsed: Value = match serde_json::from_str(argument) {
            Ok(value) => value,
            Err(e) => {
                log::debug!("restore rejected: {e}");
                return Ok(CommandOutput::Text("Failed to parse JSON.".to_string()));
            },
        };
        let Value::Object(map) = parsed else {
            return Ok(CommandOutput::Text("Failed to parse JSON.".to_string()));
        };

        let entries: Vec<(String, Value)> = map.into_iter().collect();
        let count = entries.len();
        env.store.set_many(entries)?;
        log::info!("restored {count} items");
        Ok(CommandOutput::Reload)
    }
}
