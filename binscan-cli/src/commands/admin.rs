//! Registry administration commands.
//!
//! Every mutation carries a bearer token; the registry decides whether the
//! caller is authorized.

use binscan::bins::{BinDraft, BinStatus};
use binscan::coord::Coordinate;
use binscan::registry::{BinRegistry, RegistryError};
use clap::{Args, Subcommand};
use console::style;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Optional bin fields shared by create and update.
#[derive(Debug, Args)]
pub struct BinFields {
    /// Area label shown to users
    #[arg(long)]
    pub area: Option<String>,

    /// Current fill in kg
    #[arg(long)]
    pub current: Option<f64>,

    /// Maximum capacity in kg
    #[arg(long)]
    pub max: Option<f64>,

    /// Stored status (active, full, inactive)
    #[arg(long)]
    pub status: Option<BinStatus>,
}

impl BinFields {
    fn apply(self, mut draft: BinDraft) -> Result<BinDraft, CliError> {
        if let Some(area) = self.area {
            draft.area_name = area;
        }
        if let Some(current) = self.current {
            draft.current_capacity = current;
        }
        if let Some(max) = self.max {
            draft.max_capacity = max;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if draft.current_capacity < 0.0 || draft.max_capacity < 0.0 {
            return Err(CliError::InvalidArgument(
                "Capacities cannot be negative".to_string(),
            ));
        }
        Ok(draft)
    }
}

/// Admin subcommands.
#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Register a new bin
    Create {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Requested bin id (assigned by the registry when omitted)
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        fields: BinFields,

        /// Admin token (defaults to api.token)
        #[arg(long)]
        token: Option<String>,
    },

    /// Update an existing bin
    Update {
        /// Bin id
        id: String,

        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<f64>,

        #[command(flatten)]
        fields: BinFields,

        /// Admin token (defaults to api.token)
        #[arg(long)]
        token: Option<String>,
    },

    /// Delete a bin
    Delete {
        /// Bin id
        id: String,

        /// Admin token (defaults to api.token)
        #[arg(long)]
        token: Option<String>,
    },
}

/// Run an admin subcommand.
pub async fn run(runner: &CliRunner, command: AdminCommands) -> Result<(), CliError> {
    let registry = runner.registry()?;

    match command {
        AdminCommands::Create {
            lat,
            lng,
            id,
            fields,
            token,
        } => {
            let credential = runner.admin_credential(token)?;
            let location =
                Coordinate::new(lat, lng).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
            let mut draft = BinDraft::new(location);
            if let Some(id) = id {
                draft = draft.with_bin_id(id);
            }
            let draft = fields.apply(draft)?;

            let bin = registry.create_bin(&draft, &credential).await?;
            println!(
                "{} bin {} at {}",
                style("Created").green().bold(),
                bin.bin_id,
                bin.location
            );
            Ok(())
        }
        AdminCommands::Update {
            id,
            lat,
            lng,
            fields,
            token,
        } => {
            let credential = runner.admin_credential(token)?;
            let bins = registry.fetch_bins().await?;
            let existing = bins
                .iter()
                .find(|b| b.bin_id == id)
                .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

            let mut draft = BinDraft::from(existing);
            if let (Some(lat), Some(lng)) = (lat, lng) {
                let location = Coordinate::new(lat, lng)
                    .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
                draft.latitude = location.latitude;
                draft.longitude = location.longitude;
            }
            let draft = fields.apply(draft)?;

            registry.update_bin(&id, &draft, &credential).await?;
            println!("{} bin {}", style("Updated").green().bold(), id);
            Ok(())
        }
        AdminCommands::Delete { id, token } => {
            let credential = runner.admin_credential(token)?;
            registry.delete_bin(&id, &credential).await?;
            println!("{} bin {}", style("Deleted").green().bold(), id);
            Ok(())
        }
    }
}
