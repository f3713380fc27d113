//! Session scenarios driven through real scene geometry and pointer coordinates
