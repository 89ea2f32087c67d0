const CREATE_GROUP_TABLE: &str = "CREATE TABLE IF NOT EXISTS expense_group (
  id TEXT PRIMARY KEY NOT NULL,
  created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const CREATE_GROUP_MEMBER_TABLE: &str = "CREATE TABLE IF NOT EXISTS group_member (
  group_id TEXT NOT NULL,
  member_id TEXT NOT NULL,
  name TEXT NOT NULL,
  position INTEGER NOT NULL,
  UNIQUE(group_id, member_id)
)";

const CREATE_EXPENSE_TABLE: &str = "CREATE TABLE IF NOT EXISTS expense (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  group_id TEXT NOT NULL,
  title TEXT NOT NULL,
  amount REAL NOT NULL,
  category TEXT NOT NULL,
  paid_by TEXT NOT NULL,
  timestamp DATETIME NOT NULL
)";

const CREATE_EXPENSE_SPLIT_TABLE: &str = "CREATE TABLE IF NOT EXISTS expense_split (
  expense_id INTEGER NOT NULL,
  member_id TEXT NOT NULL,
  amount REAL NOT NULL,
  position INTEGER NOT NULL,
  UNIQUE(expense_id, member_id)
)";

pub fn create_all_tables(connection: &rusqlite::Connection) -> anyhow::Result<()> {
    connection.execute(CREATE_GROUP_TABLE, ())?;
    connection.execute(CREATE_GROUP_MEMBER_TABLE, ())?;
    connection.execute(CREATE_EXPENSE_TABLE, ())?;
    connection.execute(CREATE_EXPENSE_SPLIT_TABLE, ())?;
    Ok(())
}
