use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use patient_roster_core::{Department, PatientForm, SortField, SortOrder, ViewError, ViewState};

#[derive(Parser, Debug)]
#[command(
    name = "roster",
    version,
    about = "Patient roster: list, edit, count and move patient records",
    long_about = "Manage patient records against a roster backend, or a local SQLite file with --local.\n\nExamples:\n  roster list --search jane --sort-by age --order asc\n  roster save --name \"Jane Smith\" --age 45 --gender Female --department Cardiology\n  roster --local ward.db import patients.csv\n\nBackend URL comes from --api, then ROSTER_API_BASE, then ~/.patient-roster/config.yml."
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Config file (default ~/.patient-roster/config.yml)."
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_name = "URL", help = "Backend base URL.")]
    pub api: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "DB",
        help = "Use a local SQLite file instead of a backend."
    )]
    pub local: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show one page of patients.
    List(ListArgs),

    /// Show a single patient.
    Show { id: String },

    /// Create a patient, or update one with --id.
    Save(SaveArgs),

    /// Delete a patient.
    Delete {
        id: String,

        #[arg(long, short = 'y', help = "Skip the confirmation prompt.")]
        yes: bool,
    },

    /// Head counts by department and status.
    Stats,

    /// Import patients from a CSV file.
    Import { file: PathBuf },

    /// Export every patient as CSV.
    Export {
        #[arg(long, short = 'o', value_name = "FILE", help = "Write to a file instead of stdout.")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long, short = 's', default_value = "", help = "Match name or phone.")]
    pub search: String,

    #[arg(long, short = 'd')]
    pub department: Option<String>,

    #[arg(
        long,
        default_value = "admission_date",
        help = "name, age, gender, department, admission_date or status."
    )]
    pub sort_by: String,

    #[arg(long, default_value = "desc", help = "asc or desc.")]
    pub order: String,

    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: u32,
}

impl ListArgs {
    /// View state for these arguments, already on the requested page.
    pub fn view(&self, per_page: u32) -> Result<ViewState, ViewError> {
        let mut view = ViewState::new(per_page);
        view.set_search(self.search.as_str());
        view.set_department(
            self.department
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(Department::from),
        );
        view.set_sort_by(self.sort_by.parse::<SortField>()?);
        view.set_order(self.order.parse::<SortOrder>()?);
        view.set_page(self.page);
        Ok(view)
    }
}

/// Form fields; required ones are checked by validation, not by clap.
#[derive(Args, Debug)]
pub struct SaveArgs {
    #[arg(long, help = "Update the patient with this id.")]
    pub id: Option<String>,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub age: String,

    #[arg(long, default_value = "")]
    pub gender: String,

    #[arg(long, default_value = "")]
    pub department: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub address: String,

    #[arg(long, default_value = "")]
    pub notes: String,

    #[arg(long, help = "admitted, discharged or transferred.")]
    pub status: Option<String>,
}

impl From<SaveArgs> for PatientForm {
    fn from(args: SaveArgs) -> Self {
        PatientForm {
            id: args.id,
            name: args.name,
            age: args.age,
            gender: args.gender,
            department: args.department,
            phone: args.phone,
            address: args.address,
            notes: args.notes,
            status: args.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from([
            "roster", "list", "--search", "jane", "--sort-by", "age", "--order", "asc", "-p", "2",
        ])
        .unwrap();

        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        let view = args.view(10).unwrap();
        assert_eq!(view.search(), "jane");
        assert_eq!(view.sort_by(), SortField::Age);
        assert_eq!(view.order(), SortOrder::Asc);
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn test_unknown_sort_field_rejected() {
        let cli = Cli::try_parse_from(["roster", "list", "--sort-by", "ssn"]).unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert!(matches!(args.view(10), Err(ViewError::UnknownSortField(_))));
    }

    #[test]
    fn test_global_local_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["roster", "stats", "--local", "ward.db"]).unwrap();
        assert_eq!(cli.local, Some(PathBuf::from("ward.db")));
        assert!(matches!(cli.command, Command::Stats));
    }

    #[test]
    fn test_save_args_into_form() {
        let cli = Cli::try_parse_from([
            "roster", "save", "--name", "Jane", "--age", "45", "--gender", "Female",
            "--department", "Cardiology",
        ])
        .unwrap();
        let Command::Save(args) = cli.command else {
            panic!("expected save");
        };
        let form = PatientForm::from(args);
        assert_eq!(form.target_id(), None);
        assert!(form.validate().is_ok());
    }
}
