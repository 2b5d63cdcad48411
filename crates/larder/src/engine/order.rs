use larder_core::{
    schema::{Schema, TableId},
    Error, Result,
};

use std::collections::BTreeSet;

/// Orders tables so that every foreign-key target is written before the
/// table referencing it. Registration order breaks ties, so schemas with
/// no foreign keys process exactly as registered.
pub(crate) fn dependency_order(schema: &Schema) -> Result<Vec<TableId>> {
    let len = schema.len();
    let mut references: Vec<BTreeSet<TableId>> = vec![BTreeSet::new(); len];
    let mut dependents: Vec<BTreeSet<TableId>> = vec![BTreeSet::new(); len];

    for fk in schema.foreign_keys() {
        references[fk.from_table.0].insert(fk.to_table);
        dependents[fk.to_table.0].insert(fk.from_table);
    }

    let mut ready: BTreeSet<TableId> = (0..len)
        .map(TableId)
        .filter(|id| references[id.0].is_empty())
        .collect();
    let mut order = Vec::with_capacity(len);

    while let Some(&next) = ready.iter().next() {
        ready.remove(&next);
        order.push(next);

        for &dependent in &dependents[next.0] {
            references[dependent.0].remove(&next);
            if references[dependent.0].is_empty() {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < len {
        let remaining = (0..len)
            .map(TableId)
            .filter(|id| !order.contains(id))
            .map(|id| schema.table(id).name.clone())
            .collect::<Vec<_>>();
        return Err(Error::schema_cycle(remaining));
    }

    Ok(order)
}
