// Copyright 2019-2020 PolkaX. Licensed under MIT or Apache-2.0.

mod common;

use super::*;
