pub mod libcamera_device;
pub mod preset;
pub mod still_camera;
