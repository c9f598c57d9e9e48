//! Integer lookup tables for the invariant-mass angular factor.

/// Entries per unit of |Δη| in [`COSH_MILLI`].
pub const COSH_STEPS_PER_UNIT: u64 = 40;

/// Phi bins per full turn in [`COS_MILLI`].
pub const COS_TURN_BINS: u64 = 128;

/// `round(1000 * cosh(k / 40))` for |Δη| from 0 to 10.
pub const COSH_MILLI: [u32; 401] = [
    1000, 1000, 1001, 1003, 1005, 1008, 1011, 1015, 1020, 1025,
    1031, 1038, 1045, 1053, 1062, 1071, 1081, 1092, 1103, 1115,
    1128, 1141, 1155, 1170, 1185, 1202, 1219, 1237, 1255, 1275,
    1295, 1316, 1337, 1360, 1384, 1408, 1433, 1459, 1486, 1514,
    1543, 1573, 1604, 1636, 1669, 1702, 1737, 1773, 1811, 1849,
    1888, 1929, 1971, 2014, 2058, 2104, 2151, 2199, 2249, 2300,
    2352, 2406, 2462, 2519, 2577, 2638, 2700, 2763, 2828, 2895,
    2964, 3035, 3107, 3182, 3259, 3337, 3418, 3501, 3585, 3673,
    3762, 3854, 3948, 4045, 4144, 4246, 4351, 4458, 4568, 4681,
    4797, 4915, 5037, 5162, 5290, 5422, 5557, 5695, 5837, 5983,
    6132, 6285, 6443, 6604, 6769, 6939, 7112, 7291, 7473, 7661,
    7853, 8050, 8253, 8460, 8673, 8891, 9115, 9344, 9579, 9820,
    10068, 10321, 10581, 10848, 11122, 11402, 11689, 11984, 12287, 12597,
    12915, 13241, 13575, 13917, 14269, 14629, 14999, 15378, 15766, 16164,
    16573, 16992, 17421, 17861, 18313, 18776, 19250, 19737, 20236, 20748,
    21272, 21810, 22362, 22927, 23507, 24102, 24711, 25336, 25977, 26634,
    27308, 27999, 28707, 29434, 30178, 30942, 31725, 32528, 33351, 34195,
    35060, 35947, 36857, 37789, 38746, 39726, 40732, 41762, 42819, 43903,
    45014, 46153, 47321, 48519, 49747, 51006, 52297, 53621, 54978, 56370,
    57796, 59259, 60759, 62297, 63874, 65491, 67149, 68848, 70591, 72378,
    74210, 76088, 78014, 79989, 82014, 84090, 86219, 88401, 90639, 92933,
    95286, 97698, 100171, 102707, 105307, 107972, 110705, 113508, 116381, 119327,
    122348, 125445, 128621, 131877, 135215, 138638, 142147, 145746, 149435, 153218,
    157097, 161074, 165151, 169332, 173619, 178014, 182520, 187141, 191878, 196735,
    201716, 206822, 212058, 217426, 222930, 228573, 234360, 240293, 246376, 252613,
    259007, 265564, 272287, 279180, 286247, 293494, 300923, 308541, 316352, 324360,
    332572, 340991, 349623, 358474, 367548, 376853, 386393, 396174, 406204, 416487,
    427030, 437840, 448924, 460289, 471941, 483888, 496138, 508698, 521575, 534779,
    548317, 562198, 576430, 591022, 605984, 621324, 637053, 653180, 669716, 686670,
    704053, 721876, 740150, 758887, 778099, 797796, 817993, 838700, 859932, 881701,
    904021, 926907, 950372, 974430, 999098, 1024390, 1050323, 1076912, 1104174, 1132127,
    1160786, 1190172, 1220301, 1251193, 1282867, 1315343, 1348641, 1382782, 1417788, 1453679,
    1490479, 1528211, 1566898, 1606564, 1647234, 1688934, 1731690, 1775528, 1820475, 1866561,
    1913813, 1962261, 2011936, 2062869, 2115090, 2168634, 2223533, 2279822, 2337536, 2396711,
    2457385, 2519594, 2583377, 2648776, 2715830, 2784581, 2855073, 2927350, 3001456, 3077438,
    3155344, 3235222, 3317122, 3401095, 3487195, 3575473, 3665987, 3758792, 3853946, 3951509,
    4051542, 4154107, 4259269, 4367093, 4477646, 4590999, 4707220, 4826384, 4948565, 5073838,
    5202283, 5333979, 5469010, 5607458, 5749412, 5894959, 6044190, 6197200, 6354083, 6514937,
    6679863, 6848965, 7022347, 7200119, 7382391, 7569277, 7760894, 7957362, 8158804, 8365345,
    8577114, 8794245, 9016872, 9245136, 9479177, 9719144, 9965185, 10217455, 10476111, 10741315,
    11013233,
];

/// `round(1000 * cos(2πk / 128))` for |Δφ| from 0 to π.
pub const COS_MILLI: [i32; 65] = [
    1000, 999, 995, 989, 981, 970, 957, 942, 924, 904,
    882, 858, 831, 803, 773, 741, 707, 672, 634, 596,
    556, 514, 471, 428, 383, 337, 290, 243, 195, 147,
    98, 49, 0, -49, -98, -147, -195, -243, -290, -337,
    -383, -428, -471, -514, -556, -596, -634, -672, -707, -741,
    -773, -803, -831, -858, -882, -904, -924, -942, -957, -970,
    -981, -989, -995, -999, -1000,
];
