// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host-side services for the demo binary: where config lives, and a native
// host stand-in that answers bridge requests in-process.

pub mod data_dir;
pub mod loopback;
