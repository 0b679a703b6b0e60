use crate::args::FilterArgs;
use crate::commands::{resolve_selection, Out};
use crate::dashboard::handle_action;
use crate::db::HistoryStore;
use crate::model::{AuditAction, FilterSelection};
use crate::{dataset, Config, Result};

/// Dispatches an audit log action and returns the panel text.
///
/// `save` records the current selection, which defaults its date bounds to
/// the dataset's observed range exactly as the dashboard's controls do; the
/// other actions never look at the dataset.
pub async fn history(config: Config, action: AuditAction, args: FilterArgs) -> Result<Out<()>> {
    let selection = match action {
        AuditAction::Save => {
            let table = dataset::load(config.dataset_path(), config.sheet_name())?;
            resolve_selection(&table, &args)?
        }
        AuditAction::ViewPast | AuditAction::DeleteAll => FilterSelection::default(),
    };

    let store = HistoryStore::open(config.sqlite_path()).await?;
    let text = handle_action(&store, action, &selection).await?;
    Ok(text.into())
}
