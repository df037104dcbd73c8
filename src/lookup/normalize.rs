//! Rewrite table from legacy version labels into the public grammar
//!
//! | Label                                  | Normalized                 |
//! |----------------------------------------|----------------------------|
//! | `24w03a`                               | `1.20.5-alpha.24.3.a`      |
//! | `1.18 Experimental Snapshot 7`         | `1.18-alpha.0.7`           |
//! | `26.1-snapshot-2`                      | `26.1-alpha.2`             |
//! | `1.14-pre2`, `1.14 Pre-Release 2`      | `1.14-beta.2`              |
//! | `1.16-rc1`, `1.16 Release Candidate 1` | `1.16-rc.1`                |
//! | `b1.7.3`, `Beta 1.7.3`                 | `1.0.0-beta.7.3`           |
//! | `a1.2.6`, `Alpha v1.2.6`               | `1.0.0-alpha.2.6`          |
//! | `inf-20100618`                         | `0.31.20100618`            |

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::lookup::grammar;

/// First snapshot week of each release cycle, oldest first.
/// A snapshot belongs to the last cycle that started on or before its week.
const SNAPSHOT_CYCLES: &[(u32, u32, &str)] = &[
    (11, 47, "1.1"),
    (12, 3, "1.2.1"),
    (12, 15, "1.3.1"),
    (12, 32, "1.4.2"),
    (12, 49, "1.4.6"),
    (13, 1, "1.5"),
    (13, 11, "1.5.1"),
    (13, 16, "1.6"),
    (13, 36, "1.7.2"),
    (13, 47, "1.7.4"),
    (14, 2, "1.8"),
    (15, 31, "1.9"),
    (16, 14, "1.9.3"),
    (16, 20, "1.10"),
    (16, 32, "1.11"),
    (16, 50, "1.11.1"),
    (17, 6, "1.12"),
    (17, 31, "1.12.1"),
    (17, 43, "1.13"),
    (18, 30, "1.13.1"),
    (18, 43, "1.14"),
    (19, 34, "1.15"),
    (20, 6, "1.16"),
    (20, 27, "1.16.2"),
    (20, 45, "1.17"),
    (21, 37, "1.18"),
    (22, 3, "1.18.2"),
    (22, 11, "1.19"),
    (22, 24, "1.19.1"),
    (22, 42, "1.19.3"),
    (23, 3, "1.19.4"),
    (23, 12, "1.20"),
    (23, 31, "1.20.2"),
    (23, 40, "1.20.3"),
    (23, 51, "1.20.5"),
    (24, 18, "1.21"),
    (24, 33, "1.21.2"),
    (24, 44, "1.21.4"),
    (25, 2, "1.21.5"),
    (25, 15, "1.21.6"),
    (25, 31, "1.21.9"),
    (25, 41, "1.21.11"),
];

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex")
}

static SNAPSHOT: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^(?:Snapshot )?([0-9]{2})w0?(0|[1-9][0-9]*)([a-z])$"));
static EXPERIMENTAL_SNAPSHOT: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"^([0-9]+\.[0-9]+(?:\.[0-9]+)?)(?: [Ee]xperimental [Ss]napshot |_experimental-snapshot-)([0-9]+)$")
});
static NUMBERED_SNAPSHOT: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^([0-9]+\.[0-9]+(?:\.[0-9]+)?)-snapshot-([0-9]+)$"));
static PRE_RELEASE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"^([0-9]+\.[0-9]+(?:\.[0-9]+)?)(?:-pre-?| [Pp]re-[Rr]elease )([0-9]+)$")
});
static RELEASE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"^([0-9]+\.[0-9]+(?:\.[0-9]+)?)(?:-rc-?| [Rr]elease [Cc]andidate )([0-9]+)$")
});
static OLD_BETA: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"^(?:b|Beta v?)1\.([0-9]+)(?:\.([0-9]+))?(?:_([0-9]+))?([a-z])?$")
});
static OLD_ALPHA: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"^(?:a|Alpha v?)1\.([0-9]+)(?:\.([0-9]+))?(?:_([0-9]+))?([a-z])?$")
});
static INFDEV: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^(?:inf-|Inf?dev )(?:0\.31 )?([0-9]{8})$"));

type Rule = fn(&Captures<'_>, Option<&str>) -> Option<String>;

/// Rewrite rules in the order they are tried
fn rules() -> [(&'static Regex, Rule); 8] {
    [
        (&*SNAPSHOT, rewrite_snapshot),
        (&*EXPERIMENTAL_SNAPSHOT, rewrite_experimental),
        (&*NUMBERED_SNAPSHOT, rewrite_numbered_snapshot),
        (&*PRE_RELEASE, rewrite_pre_release),
        (&*RELEASE_CANDIDATE, rewrite_release_candidate),
        (&*OLD_BETA, rewrite_old_beta),
        (&*OLD_ALPHA, rewrite_old_alpha),
        (&*INFDEV, rewrite_infdev),
    ]
}

/// Normalize a raw version label.
///
/// Tries the rewrite rules first, then accepts a label that already matches
/// the public grammar. Anything else is returned unchanged so the caller can
/// flag it.
pub fn normalize_version(raw: &str, release_target: Option<&str>) -> String {
    let label = strip_label(raw);

    if let Some(rewritten) = rewrite(label, release_target) {
        return rewritten;
    }
    if grammar::is_valid(label) {
        return label.to_string();
    }
    raw.to_string()
}

/// Apply the first matching rewrite rule whose output is grammar-conforming.
pub fn rewrite(label: &str, release_target: Option<&str>) -> Option<String> {
    rules().into_iter().find_map(|(pattern, rule)| {
        let captures = pattern.captures(label)?;
        rule(&captures, release_target).filter(|rewritten| grammar::is_valid(rewritten))
    })
}

/// Release a snapshot week belongs to, or `None` before the first cycle.
pub fn snapshot_release(year: u32, week: u32) -> Option<&'static str> {
    SNAPSHOT_CYCLES
        .iter()
        .rev()
        .find(|(start_year, start_week, _)| (*start_year, *start_week) <= (year, week))
        .map(|(_, _, release)| *release)
}

fn strip_label(raw: &str) -> &str {
    let mut label = raw.trim();
    while let Some(rest) = label.strip_prefix("Minecraft ") {
        label = rest.trim_start();
    }
    label
}

/// Capture group as a number without leading zeros
fn number(captures: &Captures<'_>, group: usize) -> Option<u64> {
    captures.get(group)?.as_str().parse().ok()
}

fn rewrite_snapshot(captures: &Captures<'_>, release_target: Option<&str>) -> Option<String> {
    let year = number(captures, 1)?;
    let week = number(captures, 2)?;
    let letter = captures.get(3)?.as_str();
    let release = match release_target.filter(|target| grammar::is_release(target)) {
        Some(target) => target,
        None => snapshot_release(u32::try_from(year).ok()?, u32::try_from(week).ok()?)?,
    };
    Some(format!("{}-alpha.{}.{}.{}", release, year, week, letter))
}

fn rewrite_experimental(captures: &Captures<'_>, _: Option<&str>) -> Option<String> {
    Some(format!("{}-alpha.0.{}", captures.get(1)?.as_str(), number(captures, 2)?))
}

fn rewrite_numbered_snapshot(captures: &Captures<'_>, _: Option<&str>) -> Option<String> {
    Some(format!("{}-alpha.{}", captures.get(1)?.as_str(), number(captures, 2)?))
}

fn rewrite_pre_release(captures: &Captures<'_>, _: Option<&str>) -> Option<String> {
    Some(format!("{}-beta.{}", captures.get(1)?.as_str(), number(captures, 2)?))
}

fn rewrite_release_candidate(captures: &Captures<'_>, _: Option<&str>) -> Option<String> {
    Some(format!("{}-rc.{}", captures.get(1)?.as_str(), number(captures, 2)?))
}

fn rewrite_old_beta(captures: &Captures<'_>, _: Option<&str>) -> Option<String> {
    legacy_prerelease("beta", captures)
}

fn rewrite_old_alpha(captures: &Captures<'_>, _: Option<&str>) -> Option<String> {
    legacy_prerelease("alpha", captures)
}

/// `1.A[.B][_C][l]` before 1.0.0 becomes `1.0.0-<key>.A[.B][.C][.l]`
fn legacy_prerelease(key: &str, captures: &Captures<'_>) -> Option<String> {
    let mut parts = vec![number(captures, 1)?.to_string()];
    for group in [2, 3] {
        if captures.get(group).is_some() {
            parts.push(number(captures, group)?.to_string());
        }
    }
    if let Some(letter) = captures.get(4) {
        parts.push(letter.as_str().to_string());
    }
    Some(format!("1.0.0-{}.{}", key, parts.join(".")))
}

fn rewrite_infdev(captures: &Captures<'_>, _: Option<&str>) -> Option<String> {
    Some(format!("0.31.{}", number(captures, 1)?))
}
