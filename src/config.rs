pub const COPY_BUFFER_SIZE: usize = 64 * 1024;
