//! Run-length collapsing of repeated block iterations.

use crate::markup::{Element, Node};

/// Structural fingerprint of an output fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FragmentFingerprint {
    pub hi: u64,
    pub lo: u64,
}

/// Fingerprint a sequence of nodes: names, attributes in order, and children.
pub fn fingerprint(nodes: &[Element]) -> FragmentFingerprint {
    let mut a = Fnv1a64::new(0xcbf29ce484222325);
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);
    write_u64_pair(&mut a, &mut b, nodes.len() as u64);
    for node in nodes {
        write_element_pair(&mut a, &mut b, node);
    }
    FragmentFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

/// Replace every maximal run of identical adjacent iterations with a single
/// `repeat` node. Runs of one are emitted unchanged, in order.
pub fn collapse(iterations: Vec<Vec<Element>>) -> Vec<Element> {
    let mut runs: Vec<(FragmentFingerprint, Vec<Element>, u64)> = Vec::new();
    for fragment in iterations {
        let fp = fingerprint(&fragment);
        match runs.last_mut() {
            Some((last_fp, last, n)) if *last_fp == fp && *last == fragment => *n += 1,
            _ => runs.push((fp, fragment, 1)),
        }
    }

    let mut out = Vec::new();
    for (_, fragment, n) in runs {
        if n > 1 {
            out.push(
                Element::new("repeat")
                    .with_attr("count", n.to_string())
                    .with_children(fragment),
            );
        } else {
            out.extend(fragment);
        }
    }
    out
}

fn write_element_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, el: &Element) {
    write_str_pair(a, b, &el.name);
    write_u64_pair(a, b, el.attrs.len() as u64);
    for (k, v) in &el.attrs {
        write_str_pair(a, b, k);
        write_str_pair(a, b, v);
    }
    write_u64_pair(a, b, el.children.len() as u64);
    for child in &el.children {
        match child {
            Node::Element(e) => {
                write_u8_pair(a, b, 0);
                write_element_pair(a, b, e);
            }
            Node::Text(t) => {
                write_u8_pair(a, b, 1);
                write_str_pair(a, b, t);
            }
        }
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    write_u64_pair(a, b, s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        self.0 = h;
    }

    fn finish(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/collapse.rs"]
mod tests;
