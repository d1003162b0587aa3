use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::operation::Arguments;
use crate::user::User;

#[derive(Debug, Error)]
pub enum Error {
    #[error("-operation flag has to be specified")]
    OperationMissing,

    #[error("-fileName flag has to be specified")]
    FileNameMissing,

    #[error("-id flag has to be specified")]
    IdMissing,

    #[error("-item flag has to be specified")]
    ItemMissing,

    #[error("Operation {0} not allowed!")]
    OperationNotAllowed(String),

    #[error("invalid input")]
    InvalidInput,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn require(value: &str, missing: Error) -> Result<&str, Error> {
    if value.is_empty() {
        return Err(missing);
    }
    Ok(value)
}

/// Read the whole record file, creating it empty when absent
fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)?;

    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    Ok(data)
}

/// Decode the record set, an empty file is an empty set
fn load_users(path: &Path) -> Result<Vec<User>, Error> {
    let data = read_file(path)?;
    if data.is_empty() {
        debug!("{} is empty", path.display());
        return Ok(Vec::new());
    }

    // a literal `null` decodes to an empty set too
    let users: Option<Vec<User>> = serde_json::from_slice(&data)?;
    let users = users.unwrap_or_default();
    debug!("loaded {} users from {}", users.len(), path.display());

    Ok(users)
}

/// Resolve symlinks so the replacement lands on the real file
fn resolve_target(path: &Path) -> Result<PathBuf, Error> {
    if path.exists() {
        return Ok(fs::canonicalize(path)?);
    }
    Ok(path.to_path_buf())
}

/// Replace the record file with the encoded set through a uniquely named
/// sibling temp file, keeping the permissions of the file it replaces
fn save_users(path: &Path, users: &[User]) -> Result<(), Error> {
    let data = serde_json::to_vec(users)?;

    let target = resolve_target(path)?;
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // removed on drop if anything below fails
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&data)?;
    if let Ok(metadata) = fs::metadata(&target) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    tmp.persist(&target).map_err(|e| Error::Io(e.error))?;
    debug!("saved {} users to {}", users.len(), target.display());

    Ok(())
}

/// Write the raw record file to the output as is
pub(crate) fn get_info<W>(args: &Arguments, writer: &mut W) -> Result<(), Error>
where
    W: Write,
{
    let file_name = require(&args.file_name, Error::FileNameMissing)?;

    let data = read_file(Path::new(file_name))?;
    if data.is_empty() {
        return Ok(());
    }

    writer.write_all(&data)?;
    Ok(())
}

/// Append a valid user unless its id is already taken
pub(crate) fn add_new_item<W>(args: &Arguments, writer: &mut W) -> Result<(), Error>
where
    W: Write,
{
    let file_name = require(&args.file_name, Error::FileNameMissing)?;
    let item = require(&args.item, Error::ItemMissing)?;

    let user: User = serde_json::from_str(item)?;
    if !user.is_valid() {
        return Err(Error::InvalidInput);
    }

    let path = Path::new(file_name);
    let mut users = load_users(path)?;

    // duplicate is reported, not failed
    if users.iter().any(|existing| existing.id == user.id) {
        write!(writer, "Item with id {} already exists", user.id)?;
        return Ok(());
    }

    info!("adding user {}", user.id);
    users.push(user);
    save_users(path, &users)
}

/// Write the user with the given id, the last one wins if the id is duplicated
pub(crate) fn find_by_id<W>(args: &Arguments, writer: &mut W) -> Result<(), Error>
where
    W: Write,
{
    let id = require(&args.id, Error::IdMissing)?;
    let file_name = require(&args.file_name, Error::FileNameMissing)?;

    let users = load_users(Path::new(file_name))?;

    match users.iter().rev().find(|user| user.id == id) {
        Some(user) => serde_json::to_writer(writer, user)?,
        None => debug!("user {id} not found"),
    }

    Ok(())
}

/// Drop every user with the given id, keeping the order of the rest
pub(crate) fn remove_user<W>(args: &Arguments, writer: &mut W) -> Result<(), Error>
where
    W: Write,
{
    let file_name = require(&args.file_name, Error::FileNameMissing)?;
    let id = require(&args.id, Error::IdMissing)?;

    let path = Path::new(file_name);
    let users = load_users(path)?;
    let count = users.len();

    let remaining: Vec<User> = users.into_iter().filter(|user| user.id != id).collect();

    if remaining.len() == count {
        write!(writer, "Item with id {id} not found")?;
        return Ok(());
    }

    info!("removing user {id}");
    save_users(path, &remaining)
}
