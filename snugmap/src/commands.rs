//! Redis command builders for encoded payloads and index definitions.
//!
//! Nothing here opens a connection; the returned [`redis::Cmd`] values are executed by
//! whatever client the caller owns.

use redis::{Cmd, cmd};
use serde_json::Value;

use crate::codec::{Encoded, Payload};
use crate::hash::HashPayload;
use crate::index::IndexDefinition;
use crate::types::DataStructure;

/// Write an encoded entity to `key`, or delete the key when the entity is empty.
pub fn write_command(key: &str, encoded: &Encoded<Payload>) -> Cmd {
    match encoded {
        Encoded::Populated(Payload::Hash(fields)) => hset(key, fields),
        Encoded::Populated(Payload::Json(document)) => json_set(key, document),
        Encoded::Empty => delete_command(key),
    }
}

pub fn hash_write_command(key: &str, encoded: &Encoded<HashPayload>) -> Cmd {
    match encoded {
        Encoded::Populated(fields) => hset(key, fields),
        Encoded::Empty => delete_command(key),
    }
}

pub fn json_write_command(key: &str, encoded: &Encoded<Value>) -> Cmd {
    match encoded {
        Encoded::Populated(document) => json_set(key, document),
        Encoded::Empty => delete_command(key),
    }
}

/// Read back whatever [`write_command`] stored for `key`.
pub fn read_command(key: &str, data_structure: DataStructure) -> Cmd {
    match data_structure {
        DataStructure::Hash => {
            let mut command = cmd("HGETALL");
            command.arg(key);
            command
        }
        DataStructure::Json => {
            let mut command = cmd("JSON.GET");
            command.arg(key).arg("$");
            command
        }
    }
}

pub fn delete_command(key: &str) -> Cmd {
    let mut command = cmd("DEL");
    command.arg(key);
    command
}

fn hset(key: &str, fields: &HashPayload) -> Cmd {
    let mut command = cmd("HSET");
    command.arg(key);
    for (member, value) in fields {
        command.arg(member.as_str()).arg(value.as_str());
    }
    command
}

fn json_set(key: &str, document: &Value) -> Cmd {
    let mut command = cmd("JSON.SET");
    command.arg(key).arg("$").arg(document.to_string());
    command
}

/// `FT.CREATE` for the definition.
pub fn create_index_command(definition: &IndexDefinition) -> Cmd {
    let mut command = cmd("FT.CREATE");
    for argument in definition.arguments() {
        command.arg(argument);
    }
    command
}

/// `FT.DROPINDEX` for the definition. Indexed documents are left in place.
pub fn drop_index_command(definition: &IndexDefinition) -> Cmd {
    let mut command = cmd("FT.DROPINDEX");
    command.arg(definition.name.as_str());
    command
}

pub fn fetch_fingerprint_command(definition: &IndexDefinition) -> Cmd {
    let mut command = cmd("GET");
    command.arg(definition.hash_name.as_str());
    command
}

pub fn store_fingerprint_command(definition: &IndexDefinition) -> Cmd {
    let mut command = cmd("SET");
    command.arg(definition.hash_name.as_str()).arg(definition.fingerprint());
    command
}

/// True when `FT.CREATE` failed only because the index is already there.
pub fn index_exists_error(err: &redis::RedisError) -> bool {
    let msg = err.to_string().to_ascii_lowercase();
    msg.contains("already exists") && msg.contains("index")
}

/// True when `FT.DROPINDEX` failed only because there was nothing to drop.
pub fn unknown_index_error(err: &redis::RedisError) -> bool {
    let msg = err.to_string().to_ascii_lowercase();
    msg.contains("unknown index name") || msg.contains("no such index")
}
