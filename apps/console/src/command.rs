use propvest_application::AssignmentTarget;
use propvest_core::{AppError, AppResult};
use propvest_domain::PermissionCheck;

pub const USAGE: &str = "usage: propvest-console [sections | check <resource>:<action>... | grant <group|user> <id> <resource>:<action>...]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Lists console sections the session may open.
    Sections,
    /// Resolves individual checks plus their any/all combination.
    Check(Vec<PermissionCheck>),
    /// Replaces a group's or user's permissions with the given grants.
    Grant {
        target: AssignmentTarget,
        grants: Vec<PermissionCheck>,
    },
}

impl ConsoleCommand {
    pub fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        match args.next().as_deref() {
            None | Some("sections") => Ok(Self::Sections),
            Some("check") => {
                let checks = parse_checks(args)?;
                if checks.is_empty() {
                    return Err(AppError::Validation(format!(
                        "check expects at least one <resource>:<action>\n{USAGE}"
                    )));
                }
                Ok(Self::Check(checks))
            }
            Some("grant") => {
                let kind = args.next().unwrap_or_default();
                let id = args.next().unwrap_or_default();
                let target = match kind.as_str() {
                    "group" => AssignmentTarget::group(id)?,
                    "user" => AssignmentTarget::user(id)?,
                    other => {
                        return Err(AppError::Validation(format!(
                            "grant target must be 'group' or 'user', got '{other}'\n{USAGE}"
                        )));
                    }
                };
                let grants = parse_checks(args)?;
                if grants.is_empty() {
                    return Err(AppError::Validation(format!(
                        "grant expects at least one <resource>:<action>\n{USAGE}"
                    )));
                }
                Ok(Self::Grant { target, grants })
            }
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}'\n{USAGE}"
            ))),
        }
    }
}

/// Splits `resource:action` on the last colon so resources like `kyc:approval` survive.
fn parse_checks(args: impl Iterator<Item = String>) -> AppResult<Vec<PermissionCheck>> {
    args.map(|arg| match arg.rsplit_once(':') {
        Some((resource, action)) if !resource.is_empty() && !action.is_empty() => {
            Ok(PermissionCheck::new(resource, action))
        }
        _ => Err(AppError::Validation(format!(
            "expected <resource>:<action>, got '{arg}'"
        ))),
    })
    .collect()
}
