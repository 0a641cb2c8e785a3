//! Chart pre-expansion and row/offset/count addressing.
//!
//! Every chart row is expanded once per compile into concrete actions. A
//! chart reference then walks that cached row: a partial pass from `offset`
//! to the end of the row, whole passes, and a partial pass from the start.
//! Actions cut by a pass boundary are re-expanded with a smaller `count`,
//! which requires the cut to land on a multiple of the action's stitch width.

use crate::compile::expand::{Expander, int_attr, node_condition};
use crate::compile::stitches::tag_chart;
use crate::document::ChartDef;
use crate::document::color::NO_COLOR;
use crate::foundation::error::{OpafError, OpafResult};
use crate::foundation::value::Scope;
use crate::markup::Element;
use crate::parser::defs::required_attr;

/// One action of an expanded chart row.
#[derive(Clone, Debug)]
pub(crate) struct ChartStitch {
    /// The `opaf:action` reference as written in the chart.
    reference: Element,
    /// Its expansion.
    output: Element,
    count: i64,
    total: i64,
}

impl ChartStitch {
    /// Stitches produced by one repetition, when that is a whole number.
    fn width(&self) -> Option<i64> {
        (self.count > 0 && self.total % self.count == 0).then(|| self.total / self.count)
    }
}

/// Cached expansion of one chart row.
#[derive(Clone, Debug)]
pub(crate) struct ChartRow {
    stitches: Vec<ChartStitch>,
    /// Colour name of every stitch, left to right.
    colors: Vec<String>,
    total: i64,
}

impl ChartRow {
    fn outputs(&self) -> impl Iterator<Item = Element> + '_ {
        self.stitches.iter().map(|s| s.output.clone())
    }
}

/// Map a 1-based row number onto `0..rows`, wrapping past the last row.
fn row_index(chart: &str, row: i64, rows: usize) -> OpafResult<usize> {
    if row <= 0 {
        return Err(OpafError::stitch(format!(
            "chart '{chart}' received an invalid or missing row ({row})"
        )));
    }
    let rows = i64::try_from(rows).map_err(|_| OpafError::stitch("chart too large"))?;
    Ok(((row - 1) % rows) as usize)
}

fn int_of(el: &Element, key: &str, chart: &str) -> OpafResult<i64> {
    let raw = el.attr(key).ok_or_else(|| {
        OpafError::stitch(format!("chart '{chart}' action has no '{key}' attribute"))
    })?;
    raw.trim().parse().map_err(|_| {
        OpafError::stitch(format!(
            "chart '{chart}' action has a non-integer {key} '{raw}'"
        ))
    })
}

impl Expander<'_> {
    /// Expand every row of `def` against the global scope.
    ///
    /// Returns the `chart` output node and the row cache used by later
    /// references. Every action reference in a row must expand to exactly one
    /// output action, and every row must keep at least one action.
    pub(crate) fn prepare_chart(
        &self,
        def: &ChartDef,
        globals: &mut Scope,
    ) -> OpafResult<(Element, Vec<ChartRow>)> {
        let mut chart = Element::new("chart").with_attr("name", &def.name);
        let mut rows = Vec::with_capacity(def.rows.len());

        for (i, row) in def.rows.iter().enumerate() {
            let scope = globals.clone();
            let mut stitches = Vec::new();
            for reference in row.elements() {
                if !node_condition(reference, &scope)? {
                    continue;
                }
                let mut expanded = self.expand_action(reference, &scope, globals)?;
                let output = match (expanded.pop(), expanded.is_empty()) {
                    (Some(output), true) => output,
                    _ => {
                        return Err(OpafError::structure(format!(
                            "chart '{}' row {}: action '{}' must expand to exactly one action",
                            def.name,
                            i + 1,
                            reference.attr("name").unwrap_or_default()
                        )));
                    }
                };
                stitches.push(ChartStitch {
                    count: int_of(&output, "count", &def.name)?,
                    total: int_of(&output, "total", &def.name)?,
                    reference: reference.clone(),
                    output,
                });
            }
            if stitches.is_empty() {
                return Err(OpafError::structure(format!(
                    "chart '{}' row {}: no actions found for row",
                    def.name,
                    i + 1
                )));
            }

            let total = stitches.iter().try_fold(0i64, |acc, s| {
                acc.checked_add(s.total)
                    .ok_or_else(|| OpafError::stitch("stitch count overflow"))
            })?;
            let mut colors = Vec::new();
            for s in &stitches {
                let color = s.output.attr("colour").unwrap_or(NO_COLOR);
                for _ in 0..s.total.max(0) {
                    colors.push(color.to_owned());
                }
            }

            let outputs: Vec<Element> = stitches.iter().map(|s| s.output.clone()).collect();
            chart.push(self.finish_row(row, outputs, &scope, globals)?);
            rows.push(ChartRow {
                stitches,
                colors,
                total,
            });
        }
        Ok((chart, rows))
    }

    fn chart_rows(&self, name: &str) -> OpafResult<&[ChartRow]> {
        self.charts
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| OpafError::reference(format!("chart with name '{name}' not found")))
    }

    /// Colour of stitch `stitch` (0-based, wrapping, negative from the end)
    /// in row `row` (1-based, wrapping) of chart `name`.
    pub(crate) fn chart_color(&self, name: &str, row: i64, stitch: i64) -> OpafResult<String> {
        let rows = self.chart_rows(name)?;
        let row = &rows[row_index(name, row, rows.len())?];
        let len = i64::try_from(row.colors.len()).unwrap_or(i64::MAX);
        if len == 0 {
            return Err(OpafError::stitch(format!(
                "chart '{name}' row has no stitches to take a color from"
            )));
        }
        Ok(row.colors[stitch.rem_euclid(len) as usize].clone())
    }

    /// Expand an `opaf:chart` reference (`row`, `offset`, `count`).
    pub(crate) fn expand_chart(
        &self,
        node: &Element,
        scope: &Scope,
        globals: &mut Scope,
    ) -> OpafResult<Vec<Element>> {
        let name = required_attr(node, "name")?;
        self.doc.chart(name)?;
        let rows = self.chart_rows(name)?;

        let row_num = int_attr(node, "row", scope)?.unwrap_or(0);
        let index = row_index(name, row_num, rows.len())?;
        let row = &rows[index];
        let n = row.total;
        if n <= 0 {
            return Err(OpafError::stitch(format!(
                "chart '{name}' row {} produces no stitches",
                index + 1
            )));
        }

        let offset = int_attr(node, "offset", scope)?.unwrap_or(0).rem_euclid(n);
        let count = int_attr(node, "count", scope)?.unwrap_or(n);
        if count < 0 {
            return Err(OpafError::stitch(format!(
                "chart '{name}' received a negative count ({count})"
            )));
        }

        let mut out = Vec::new();
        let mut remaining = count;
        if offset > 0 && remaining > 0 {
            let take = remaining.min(n - offset);
            out.extend(self.row_segment(name, row, offset, offset + take, scope, globals)?);
            remaining -= take;
        }

        let passes = remaining / n;
        if passes > 1 {
            out.push(
                Element::new("repeat")
                    .with_attr("count", passes.to_string())
                    .with_children(row.outputs()),
            );
        } else if passes == 1 {
            out.extend(row.outputs());
        }
        remaining -= passes * n;

        if remaining > 0 {
            out.extend(self.row_segment(name, row, 0, remaining, scope, globals)?);
        }

        tag_chart(&mut out, name, index + 1);
        Ok(out)
    }

    /// Actions covering stitches `start..end` of one pass through `row`.
    fn row_segment(
        &self,
        name: &str,
        row: &ChartRow,
        start: i64,
        end: i64,
        scope: &Scope,
        globals: &mut Scope,
    ) -> OpafResult<Vec<Element>> {
        let mut out = Vec::new();
        let mut pos = 0i64;
        for stitch in &row.stitches {
            let (a, b) = (pos, pos + stitch.total);
            pos = b;

            if stitch.total == 0 {
                // Zero-width actions belong to the segment holding their position.
                if (start <= a && a < end) || (a == end && end == row.total) {
                    out.push(stitch.output.clone());
                }
                continue;
            }

            let (lo, hi) = (a.max(start), b.min(end));
            if lo >= hi {
                continue;
            }
            if lo == a && hi == b {
                out.push(stitch.output.clone());
                continue;
            }

            let width = stitch.width().filter(|w| (lo - a) % w == 0 && (hi - lo) % w == 0);
            let Some(width) = width else {
                return Err(OpafError::stitch(format!(
                    "chart '{name}' cannot return desired stitch count: \
                     stitches {start}..{end} split action '{}'",
                    stitch.reference.attr("name").unwrap_or_default()
                )));
            };
            let partial = stitch
                .reference
                .clone()
                .with_attr("count", ((hi - lo) / width).to_string());
            out.extend(self.expand_action(&partial, scope, globals)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/chart.rs"]
mod tests;
