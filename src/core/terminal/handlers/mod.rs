pub(super) mod attributes;
pub(super) mod cursor;
pub(super) mod device;
pub(super) mod edit;
pub(super) mod erase;
pub(super) mod private_modes;
pub(super) mod scroll;
pub(super) mod sgr;
