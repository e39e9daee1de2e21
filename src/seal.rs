pub trait Seal {}

impl Seal for i32 {}
impl Seal for i64 {}
impl Seal for isize {}
impl Seal for u32 {}
impl Seal for u64 {}
impl Seal for usize {}

impl Seal for f32 {}
impl Seal for f64 {}
impl Seal for crate::c32 {}
impl Seal for crate::c64 {}
