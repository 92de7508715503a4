// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Human-readable dump of a solved (or capped) search.
//!
//! The report is a single `Manager` block: the problem description, the
//! root state, and a recursive listing of weighings and their outcome
//! states, indented two spaces per level. Each state gets a monotone id on
//! first appearance; later appearances are back-references, so the DAG is
//! printed without duplication. Happy-path mode keeps a single optimal
//! weighing per state.
//!
//! Reports are deterministic: the same problem produces byte-identical
//! output on every run.

use std::io;

use rustc_hash::FxHashMap;

use crate::problem::{Problem, SearchState};
use crate::search::{Search, StateId};

/// Line-oriented indented text writer.
pub struct Report<W: io::Write> {
    out: W,
    level: usize,
    happy_path: bool,
}

impl<W: io::Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            level: 0,
            happy_path: false,
        }
    }

    /// Restrict the tree to one optimal weighing per state.
    pub fn with_happy_path(mut self, happy_path: bool) -> Self {
        self.happy_path = happy_path;
        self
    }

    pub fn happy_path(&self) -> bool {
        self.happy_path
    }

    /// Set the indentation level (two spaces per level).
    pub fn set_level(&mut self, level: usize) {
        self.level = level;
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn outdent(&mut self) {
        assert!(self.level > 0, "cannot outdent past the margin");
        self.level -= 1;
    }

    /// Write one line at the current indentation.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        for _ in 0..self.level {
            self.out.write_all(b"  ")?;
        }
        self.out.write_all(text.as_bytes())?;
        self.out.write_all(b"\n")
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Bounds rendered as `n` when resolved, `lo..hi` or `lo..?` otherwise.
fn bounds_label(depth_min: u8, depth_max: Option<u8>) -> String {
    match depth_max {
        Some(max) if max == depth_min => format!("{}", depth_min),
        Some(max) => format!("{}..{}", depth_min, max),
        None => format!("{}..?", depth_min),
    }
}

/// The first weighing of `state` achieving its upper bound, for happy-path
/// output. Falls back to the first weighing when the state is unresolved.
fn optimal_child<P: Problem>(search: &Search<P>, state: StateId) -> usize {
    let status = search.status(state);
    if let Some(depth_max) = status.depth_max {
        for (index, child) in status.children.iter().enumerate() {
            let worst = child
                .present()
                .map(|outcome| search.status(outcome).depth_max)
                .try_fold(0u8, |acc, depth| depth.map(|d| acc.max(d)));
            if worst == Some(depth_max.saturating_sub(1)) {
                return index;
            }
        }
    }
    0
}

/// Write the whole report for `search` into `report`.
pub fn write_report<P: Problem, W: io::Write>(
    search: &Search<P>,
    report: &mut Report<W>,
) -> io::Result<()> {
    let root = search.root();
    let (depth_min, depth_max) = search.root_bounds();
    let coin_count = search
        .cache()
        .partition(search.state(root).partition())
        .coin_count();

    report.set_level(0);
    report.line(&format!(
        "Manager {{ coins: {}, states: {}, partitions: {}, weighings: {}, depth: {} }}",
        coin_count,
        search.state_count(),
        search.cache().partition_count(),
        search.cache().weighing_count(),
        bounds_label(depth_min, depth_max),
    ))?;
    report.set_level(1);
    search.problem().write_description(report)?;

    let happy = report.happy_path();
    let mut walk = search.walk(happy);
    let mut display_ids: FxHashMap<StateId, usize> = FxHashMap::default();

    report.set_level(1);
    emit_state(search, report, &mut display_ids, None, root)?;
    let mut descend = should_descend(search, root);
    // Weighing headers already written, one per level of the current path.
    let mut headers: Vec<(StateId, usize)> = Vec::new();
    loop {
        let moved = if descend {
            if happy {
                walk.advance_child(optimal_child(search, walk.current()))
            } else {
                walk.advance_first_child()
            }
        } else {
            false
        };
        if !moved && !walk.advance_prune() {
            break;
        }

        let frame = *walk.path().last().expect("below the root after a move");
        let depth = walk.depth();
        headers.truncate(depth);
        if headers.len() < depth || headers[depth - 1] != (frame.state, frame.child) {
            headers.truncate(depth - 1);
            report.set_level(2 * depth);
            emit_weighing(search, report, frame.state, frame.child)?;
            headers.push((frame.state, frame.child));
        }
        report.set_level(2 * depth + 1);
        let (_, outcome) = walk.edge().expect("edge exists below the root");
        let first_visit = emit_state(
            search,
            report,
            &mut display_ids,
            Some(outcome),
            walk.current(),
        )?;
        descend = first_visit && should_descend(search, walk.current());
    }
    report.flush()
}

/// Whether the listing should recurse below this state.
fn should_descend<P: Problem>(search: &Search<P>, state: StateId) -> bool {
    let status = search.status(state);
    !status.is_solved() && !status.children.is_empty()
}

/// Write the header line for one weighing of `state`.
fn emit_weighing<P: Problem, W: io::Write>(
    search: &Search<P>,
    report: &mut Report<W>,
    state: StateId,
    child_index: usize,
) -> io::Result<()> {
    let cache = search.cache();
    let child = &search.status(state).children[child_index];
    let input_len = cache.partition(search.state(state).partition()).len();
    let output = cache.partition(child.output);
    let (left, right) = cache.weighing(child.weighing).pan_selections(output, input_len);
    report.line(&format!(
        "Weighing {}: left {:?}, right {:?} -> {}",
        child_index, left, right, output
    ))
}

/// Write the line (and hooks) for arriving at `state`; returns whether this
/// was its first appearance.
fn emit_state<P: Problem, W: io::Write>(
    search: &Search<P>,
    report: &mut Report<W>,
    display_ids: &mut FxHashMap<StateId, usize>,
    outcome: Option<crate::coins::Outcome>,
    state: StateId,
) -> io::Result<bool> {
    let label = match outcome {
        Some(outcome) => format!("{}: ", outcome.label()),
        None => String::new(),
    };
    if let Some(&id) = display_ids.get(&state) {
        report.line(&format!("{}#{} (shown above)", label, id))?;
        return Ok(false);
    }
    let id = display_ids.len();
    display_ids.insert(state, id);

    let status = search.status(state);
    let partition = search.cache().partition(search.state(state).partition());
    report.line(&format!(
        "{}#{}: {}; depth {}",
        label,
        id,
        partition,
        bounds_label(status.depth_min, status.depth_max),
    ))?;

    report.indent();
    let problem = search.problem();
    let value = search.state(state);
    if status.is_solved() {
        problem.write_solved(report, value)?;
    } else {
        problem.write_state(report, value)?;
        if !status.is_resolved() {
            problem.write_ambiguous(report, value)?;
        }
    }
    report.outdent();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::majority::MajorityProblem;

    fn render(coin_count: u8, happy_path: bool) -> String {
        let mut search = Search::new(MajorityProblem::new(coin_count, true).unwrap());
        search.solve(8);
        let mut buffer = Vec::new();
        {
            let mut report = Report::new(&mut buffer).with_happy_path(happy_path);
            write_report(&search, &mut report).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_report_header_and_root() {
        let text = render(3, false);
        assert!(text.starts_with("Manager { coins: 3,"));
        assert!(text.contains("depth: 2 }"));
        assert!(text.contains("#0: Partition { 1 part; sizes: [3] }; depth 2"));
        assert!(text.contains("Find the majority variety among 3 coins"));
    }

    #[test]
    fn test_report_lists_outcomes_and_solutions() {
        let text = render(3, false);
        assert!(text.contains("Weighing 0: left [1], right [1]"));
        assert!(text.contains("Left: #"));
        assert!(text.contains("Balanced: #"));
        assert!(text.contains("solved: H is the majority") || text.contains("solved: L is the majority"));
    }

    #[test]
    fn test_report_is_deterministic() {
        assert_eq!(render(5, false), render(5, false));
    }

    #[test]
    fn test_happy_path_is_a_subset() {
        let full = render(5, false);
        let happy = render(5, true);
        assert!(happy.len() < full.len());
        let weighings = |text: &str| text.matches("Weighing ").count();
        assert!(weighings(&happy) < weighings(&full));
    }

    #[test]
    fn test_back_references_for_shared_states() {
        let text = render(5, false);
        assert!(text.contains("(shown above)"));
    }

    #[test]
    fn test_bounds_label() {
        assert_eq!(bounds_label(3, Some(3)), "3");
        assert_eq!(bounds_label(2, Some(4)), "2..4");
        assert_eq!(bounds_label(2, None), "2..?");
    }
}
