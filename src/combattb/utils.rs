use rusqlite::Connection;

use crate::constants::STORE_TABLE_NAMES;

// Create the graph store tables if they don't exist yet.  All tables are
// created in one transaction so a half initialised database can't happen.
pub fn make_store_tables(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;

    let [nodes_table, unique_values_table, edges_table] = *STORE_TABLE_NAMES;

    tx.execute(
        &format!("CREATE TABLE IF NOT EXISTS {} (
                    id    INTEGER PRIMARY KEY AUTOINCREMENT,
                    kind  TEXT NOT NULL,
                    data  TEXT NOT NULL
                 )",
                 nodes_table),
        (),
    )?;

    tx.execute(
        &format!("CREATE TABLE IF NOT EXISTS {} (
                    scope    TEXT NOT NULL,
                    field    TEXT NOT NULL,
                    value    TEXT NOT NULL,
                    node_id  INTEGER NOT NULL REFERENCES {}(id),
                    PRIMARY KEY (scope, field, value)
                 )",
                 unique_values_table, nodes_table),
        (),
    )?;

    tx.execute(
        &format!("CREATE TABLE IF NOT EXISTS {} (
                    id      INTEGER PRIMARY KEY AUTOINCREMENT,
                    source  INTEGER NOT NULL REFERENCES {}(id),
                    label   TEXT NOT NULL,
                    target  INTEGER NOT NULL REFERENCES {}(id)
                 )",
                 edges_table, nodes_table, nodes_table),
        (),
    )?;

    tx.execute(&format!("CREATE INDEX IF NOT EXISTS {0}_kind_idx ON {0} (kind)", nodes_table),
               ())?;
    tx.execute(&format!("CREATE INDEX IF NOT EXISTS {0}_node_idx ON {0} (node_id)",
                        unique_values_table),
               ())?;
    tx.execute(&format!("CREATE INDEX IF NOT EXISTS {0}_source_idx ON {0} (source, label)",
                        edges_table),
               ())?;
    tx.execute(&format!("CREATE INDEX IF NOT EXISTS {0}_target_idx ON {0} (target, label)",
                        edges_table),
               ())?;

    tx.commit()?;

    Ok(())
}

#[test]
fn test_make_store_tables_twice() {
    let mut conn = Connection::open_in_memory().unwrap();
    make_store_tables(&mut conn).unwrap();
    make_store_tables(&mut conn).unwrap();

    let count: i64 =
        conn.query_row("SELECT count(*) FROM sqlite_master WHERE type = 'table' \
                        AND name IN ('nodes', 'unique_values', 'edges')",
                       (), |row| row.get(0))
        .unwrap();
    assert_eq!(count, 3);
}
