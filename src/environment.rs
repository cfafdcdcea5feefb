use crate::prelude::*;

pub struct Environment<'a> {
    pub stdout: &'a mut dyn Write,
    pub lxd: &'a mut LxdDriver,
}

impl<'a> Environment<'a> {
    pub fn new(stdout: &'a mut dyn Write, lxd: &'a mut LxdDriver) -> Self {
        Self { stdout, lxd }
    }
}
