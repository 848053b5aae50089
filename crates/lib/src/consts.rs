/// File name that marks a CMake project directory.
pub const DESCRIPTOR_FILE_NAME: &str = "CMakeLists.txt";

/// Name of the build-output directory created next to the top-level descriptor.
pub const BUILD_DIR_NAME: &str = "build";

/// Subdirectory of the project root that is searched for descriptors.
pub const SOURCE_SUBDIR: &str = "src";

pub const DEFAULT_TOOLCHAIN: &str = "cmake";

/// Environment variable overriding the toolchain binary.
pub const TOOLCHAIN_ENV: &str = "CMBRIDGE_TOOLCHAIN";

/// Environment variable holding the host project root.
pub const PROJECT_DIR_ENV: &str = "PROJECT_DIR";
