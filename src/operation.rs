use std::io::Write;
use std::str::FromStr;

use log::debug;

use crate::store::{self, Error};

/// Flag values as given on the command line, blank when not passed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Arguments {
    pub(crate) operation: String,
    pub(crate) id: String,
    pub(crate) item: String,
    pub(crate) file_name: String,
}

/// Operation selected by the `-operation` flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Operation {
    /// Append a new user from `-item`
    Add,
    /// Print the record file as is
    List,
    /// Print the user with `-id`
    FindById,
    /// Delete the users with `-id`
    Remove,
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "add" => Ok(Operation::Add),
            "list" => Ok(Operation::List),
            "findById" => Ok(Operation::FindById),
            "remove" => Ok(Operation::Remove),
            "" => Err(Error::OperationMissing),
            other => Err(Error::OperationNotAllowed(other.to_string())),
        }
    }
}

/// Route the arguments to the selected operation, writing its output to `writer`
pub(crate) fn perform<W>(args: &Arguments, writer: &mut W) -> Result<(), Error>
where
    W: Write,
{
    let operation: Operation = args.operation.parse()?;
    debug!("performing {operation:?} on {:?}", args.file_name);

    match operation {
        Operation::Add => store::add_new_item(args, writer),
        Operation::List => store::get_info(args, writer),
        Operation::FindById => store::find_by_id(args, writer),
        Operation::Remove => store::remove_user(args, writer),
    }
}
