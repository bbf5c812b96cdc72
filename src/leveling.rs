//! Course families and prerequisite depth, producing the leveled input of
//! the layout engine.
//!
//! Courses are split into families by the first digit of their course
//! number (`ITSC 1212` -> family 1). Each family is leveled on its own and
//! gets a contiguous block of columns, so a family's prerequisites inside the
//! family always sit in earlier columns.
//!
//! A prerequisite from a later family lands in a later column than the
//! course requiring it. Such links are dropped here, so they appear neither
//! as edges nor in the ancestor and descendant sets.

use std::collections::{HashMap, HashSet};

use crate::course::{CourseDataset, CourseRecord};
use crate::layout::NodeStub;

/// Character position of the family digit in a course name.
pub const FAMILY_DIGIT_POSITION: usize = 5;
/// Families are keyed by a single decimal digit.
pub const FAMILY_COUNT: usize = 10;
/// Relaxation passes allowed before a family is treated as cyclic, unless the
/// family is larger.
pub const MIN_PASS_BOUND: usize = 20;

/// Family of a course, from the digit at [`FAMILY_DIGIT_POSITION`] of its
/// name. Names without a digit there belong to family 0.
pub fn family_of(name: &str) -> usize {
    name.chars()
        .nth(FAMILY_DIGIT_POSITION)
        .and_then(|c| c.to_digit(10))
        .map_or(0, |d| d as usize)
}

/// Depths of one family's courses.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyDepths {
    pub depths: HashMap<String, usize>,
    pub max_depth: usize,
    pub passes: usize,
    /// False when the pass bound was hit, which only happens on cyclic data.
    pub converged: bool,
}

/// Column range assigned to one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyColumns {
    pub family: usize,
    pub first_column: usize,
    /// `max_depth + 1`; an empty family still takes one column.
    pub columns: usize,
}

/// Leveled input for the layout engine plus the family column map.
#[derive(Debug, Clone, PartialEq)]
pub struct Leveling {
    pub levels: Vec<Vec<NodeStub>>,
    pub families: Vec<FamilyColumns>,
}

/// Relax depths over the prerequisite links that stay inside the family.
///
/// A course sits one level past its deepest in-family prerequisite. Passes
/// repeat until nothing changes; a bound of `max(MIN_PASS_BOUND, members)`
/// passes stops cyclic data.
pub fn relax_family(members: &[&CourseRecord]) -> FamilyDepths {
    let in_family: HashSet<&str> = members.iter().map(|r| r.course_id.as_str()).collect();
    let mut depths: HashMap<String, usize> = members
        .iter()
        .map(|r| (r.course_id.clone(), 0))
        .collect();

    let bound = MIN_PASS_BOUND.max(members.len());
    let mut passes = 0;
    let mut converged = false;

    while passes < bound {
        passes += 1;
        let mut changed = false;

        for record in members {
            let current = depths[&record.course_id];
            let depth = record
                .links
                .iter()
                .filter(|link| **link != record.course_id && in_family.contains(link.as_str()))
                .map(|link| depths[link] + 1)
                .fold(current, usize::max);

            if depth != current {
                depths.insert(record.course_id.clone(), depth);
                changed = true;
            }
        }

        if !changed {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "depths still changing after {} passes over {} courses; prerequisites are cyclic",
            passes,
            members.len()
        );
    }

    let max_depth = depths.values().copied().max().unwrap_or(0);
    FamilyDepths {
        depths,
        max_depth,
        passes,
        converged,
    }
}

/// Parent ids of a course: its links that name another course placed in an
/// earlier column, without repeats, in link order.
fn parent_ids(record: &CourseRecord, columns: &HashMap<&str, usize>) -> Vec<String> {
    let column = columns[record.course_id.as_str()];
    let mut parents: Vec<String> = Vec::new();
    for link in &record.links {
        if *link == record.course_id || parents.contains(link) {
            continue;
        }
        match columns.get(link.as_str()) {
            Some(&parent_column) if parent_column < column => parents.push(link.clone()),
            Some(&parent_column) => log::debug!(
                "course {} (column {}): prerequisite {} is in column {}; link dropped",
                record.course_id,
                column,
                link,
                parent_column
            ),
            None => {}
        }
    }
    parents
}

/// Partition the dataset into families, level each family, and bucket every
/// course into its global column.
pub fn level_courses(dataset: &CourseDataset) -> Leveling {
    let mut by_family: Vec<Vec<&CourseRecord>> = vec![Vec::new(); FAMILY_COUNT];
    for record in dataset.records() {
        by_family[family_of(&record.name)].push(record);
    }

    let mut families = Vec::with_capacity(FAMILY_COUNT);
    let mut family_depths = Vec::with_capacity(FAMILY_COUNT);
    let mut total_columns = 0;

    for (family, members) in by_family.iter().enumerate() {
        let depths = relax_family(members);
        log::debug!(
            "family {}: {} courses, max depth {}, {} passes",
            family,
            members.len(),
            depths.max_depth,
            depths.passes
        );
        let columns = depths.max_depth + 1;
        families.push(FamilyColumns {
            family,
            first_column: total_columns,
            columns,
        });
        total_columns += columns;
        family_depths.push(depths);
    }

    let columns: HashMap<&str, usize> = dataset
        .records()
        .iter()
        .map(|record| {
            let family = family_of(&record.name);
            let depth = family_depths[family]
                .depths
                .get(&record.course_id)
                .copied()
                .unwrap_or(0);
            (record.course_id.as_str(), families[family].first_column + depth)
        })
        .collect();
    let mut levels: Vec<Vec<NodeStub>> = vec![Vec::new(); total_columns];

    for record in dataset.records() {
        levels[columns[record.course_id.as_str()]].push(NodeStub {
            id: record.course_id.clone(),
            parents: parent_ids(record, &columns),
            label: Some(record.name.clone()),
            url: record.catalog_url(),
        });
    }

    Leveling { levels, families }
}
